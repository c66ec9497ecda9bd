// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document inspection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument};

use folio_core::PageBox;
use folio_core::error::Result;

use crate::engine::PdfEngine;
use crate::pdf::{DocumentBackend, StructuralBackend};

/// Summary of a document: page count, metadata, encryption and geometry.
///
/// A locked document (one that needs a password to open) has no readable
/// page tree: `page_count` is `None` and `pages` and `metadata` are empty.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub path: PathBuf,
    pub page_count: Option<usize>,
    pub encrypted: bool,
    pub locked: bool,
    pub metadata: BTreeMap<String, String>,
    pub pages: Vec<PageInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    /// 1-based.
    pub number: usize,
    pub width: f32,
    pub height: f32,
    pub rotation: i64,
    pub media_box: PageBox,
}

impl PdfEngine {
    /// Read a document's summary without writing anything.
    #[instrument(skip_all, fields(input = %input.as_ref().display()))]
    pub fn inspect(&self, input: impl AsRef<Path>) -> Result<DocumentInfo> {
        let input = input.as_ref();
        self.check_input(input)?;
        let doc = StructuralBackend.open(input)?;

        if doc.is_locked() {
            debug!("Document needs a password, page tree unavailable");
            return Ok(DocumentInfo {
                path: input.to_path_buf(),
                page_count: None,
                encrypted: true,
                locked: true,
                metadata: BTreeMap::new(),
                pages: Vec::new(),
            });
        }

        let pages = doc
            .page_ids()
            .into_iter()
            .enumerate()
            .map(|(index, page_id)| {
                let media_box = doc.media_box(page_id);
                PageInfo {
                    number: index + 1,
                    width: media_box.width(),
                    height: media_box.height(),
                    rotation: doc.rotation(page_id),
                    media_box,
                }
            })
            .collect();

        Ok(DocumentInfo {
            path: input.to_path_buf(),
            page_count: Some(doc.page_count()),
            encrypted: doc.is_encrypted(),
            locked: false,
            metadata: doc.metadata(),
            pages,
        })
    }
}
