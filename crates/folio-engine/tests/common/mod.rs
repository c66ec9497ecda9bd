// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for the engine integration tests: synthetic PDFs whose
// pages say "Page N", and an engine rooted in a throwaway directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use tempfile::TempDir;

use folio_core::{EngineConfig, PageBox};
use folio_engine::PdfEngine;
use folio_engine::pdf::page;

pub struct Workspace {
    pub dir: TempDir,
    pub engine: PdfEngine,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let engine = PdfEngine::new(EngineConfig::with_temp_dir(dir.path().join("scratch")));
        Self { dir, engine }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// The engine's temp directory.
    pub fn scratch(&self) -> PathBuf {
        self.path("scratch")
    }

    /// Write a Letter-sized document with `pages` labelled pages.
    pub fn pdf(&self, name: &str, pages: u32) -> PathBuf {
        let path = self.path(name);
        let mut doc = labelled_document(pages, 612.0, 792.0);
        doc.save(&path).expect("save fixture");
        path
    }

    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).expect("write fixture");
        path
    }
}

/// A document whose page `n` draws "Page n". MediaBox and Resources live on
/// the `/Pages` node and are inherited by every page.
pub fn labelled_document(pages: u32, width: f32, height: f32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for n in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {n}"))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), Object::Real(width), Object::Real(height)],
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Fixture"),
        "Producer" => Object::string_literal("folio tests"),
    });
    doc.trailer.set("Info", info_id);
    doc
}

pub fn load(path: &Path) -> Document {
    let mut doc = Document::load(path).expect("load output");
    doc.decompress();
    doc
}

/// The "Page N" labels of every page, in page order.
pub fn labels(path: &Path) -> Vec<String> {
    let doc = load(path);
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).expect("page content");
            label_in(&String::from_utf8_lossy(&content)).unwrap_or_default()
        })
        .collect()
}

fn label_in(content: &str) -> Option<String> {
    let start = content.find("(Page ")? + 1;
    let end = start + content[start..].find(')')?;
    Some(content[start..end].to_string())
}

pub fn expected_labels(numbers: impl IntoIterator<Item = u32>) -> Vec<String> {
    numbers.into_iter().map(|n| format!("Page {n}")).collect()
}

pub fn rotations(path: &Path) -> Vec<i64> {
    let doc = load(path);
    doc.get_pages()
        .into_values()
        .map(|page_id| page::rotation(&doc, page_id))
        .collect()
}

pub fn media_boxes(path: &Path) -> Vec<PageBox> {
    let doc = load(path);
    doc.get_pages()
        .into_values()
        .map(|page_id| page::media_box(&doc, page_id))
        .collect()
}

/// Files left in `dir`, sorted by name.
pub fn entries(dir: &Path) -> Vec<String> {
    let Ok(read) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = read
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
