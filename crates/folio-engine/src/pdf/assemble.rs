// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page assembly — build a fresh document out of pages taken from other
// documents, or out of synthetic pages.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, warn};

use folio_core::PageBox;
use folio_core::error::{FolioError, Result};

use super::page::{INHERITABLE_KEYS, box_object, inherited_attribute};

// -- Object import ------------------------------------------------------------

/// Copies objects from one document into another, following references.
///
/// Each source object is copied at most once per importer, so resources shared
/// between pages stay shared and reference cycles terminate. References to
/// page or page-tree nodes that were not imported themselves become `null`
/// rather than dragging foreign pages along.
#[derive(Default)]
pub struct ObjectImporter {
    memo: HashMap<ObjectId, ObjectId>,
}

impl ObjectImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-copy `object` (which lives in `source`) into `target`.
    pub fn import(&mut self, source: &Document, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.import_reference(source, target, *id),
            Object::Dictionary(dict) => Object::Dictionary(self.import_dict(source, target, dict)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.import(source, target, item))
                    .collect(),
            ),
            Object::Stream(stream) => {
                let dict = self.import_dict(source, target, &stream.dict);
                Object::Stream(Stream::new(dict, stream.content.clone()))
            }
            other => other.clone(),
        }
    }

    fn import_dict(
        &mut self,
        source: &Document,
        target: &mut Document,
        dict: &Dictionary,
    ) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            copy.set(key.clone(), self.import(source, target, value));
        }
        copy
    }

    fn import_reference(&mut self, source: &Document, target: &mut Document, id: ObjectId) -> Object {
        if let Some(mapped) = self.memo.get(&id) {
            return Object::Reference(*mapped);
        }

        let referenced = match source.get_object(id) {
            Ok(obj) => obj,
            Err(err) => {
                warn!(?id, %err, "Cannot resolve reference, using null");
                return Object::Null;
            }
        };

        if is_page_tree_node(referenced) {
            debug!(?id, "Dropping reference to a page outside the assembly");
            return Object::Null;
        }

        let new_id = target.new_object_id();
        self.memo.insert(id, new_id);
        let copy = self.import(source, target, referenced);
        target.objects.insert(new_id, copy);
        Object::Reference(new_id)
    }

    /// Pre-register a mapping so references to `source_id` resolve to `target_id`.
    fn bind(&mut self, source_id: ObjectId, target_id: ObjectId) {
        self.memo.insert(source_id, target_id);
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    matches!(
        dict.get(b"Type").and_then(|t| t.as_name()),
        Ok(b"Page") | Ok(b"Pages")
    )
}

// -- Page assembly ------------------------------------------------------------

/// Builds a new single-level page tree.
pub struct PageAssembler {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl Default for PageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl PageAssembler {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Start importing pages from `source`. Pages imported through the same
    /// importer share their copied resources.
    pub fn importer<'a>(&'a mut self, source: &'a Document) -> PageImporter<'a> {
        PageImporter {
            assembler: self,
            source,
            objects: ObjectImporter::new(),
        }
    }

    /// Append a page with the given box, content and resources.
    pub fn push_synthetic_page(
        &mut self,
        media_box: &PageBox,
        content: Vec<u8>,
        resources: Dictionary,
    ) -> ObjectId {
        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content));
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => box_object(media_box),
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.kids.push(Object::Reference(page_id));
        page_id
    }

    /// Add a shared object (font, image, graphics state) to the new document.
    pub fn add_object(&mut self, object: impl Into<Object>) -> ObjectId {
        self.doc.add_object(object)
    }

    /// Copy `/Info` from a source document into the new one.
    pub fn carry_info(&mut self, source: &Document) {
        let Ok(info) = source.trailer.get(b"Info") else {
            return;
        };
        let mut importer = ObjectImporter::new();
        let copied = importer.import(source, &mut self.doc, info);
        self.doc.trailer.set("Info", copied);
    }

    /// Close the page tree and hand back the document.
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        self.doc
    }
}

/// Appends pages from one source document to a [`PageAssembler`].
pub struct PageImporter<'a> {
    assembler: &'a mut PageAssembler,
    source: &'a Document,
    objects: ObjectImporter,
}

impl PageImporter<'_> {
    /// Deep-copy the page `page_id` and append it to the new page tree.
    ///
    /// Inherited attributes are written onto the copy, since it no longer
    /// sits under the source's `/Pages` nodes.
    pub fn append(&mut self, page_id: ObjectId) -> Result<ObjectId> {
        let page = self.source.get_dictionary(page_id).map_err(|err| {
            FolioError::RenderFailed(format!("page object {:?} is unreadable: {}", page_id, err))
        })?;

        let pages_id = self.assembler.pages_id;
        let target = &mut self.assembler.doc;
        let new_id = target.new_object_id();
        self.objects.bind(page_id, new_id);

        let mut copy = Dictionary::new();
        for (key, value) in page.iter() {
            if key == b"Parent" {
                continue;
            }
            copy.set(key.clone(), self.objects.import(self.source, target, value));
        }
        for key in INHERITABLE_KEYS {
            if copy.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(self.source, page_id, key) {
                copy.set(key.to_vec(), self.objects.import(self.source, target, &value));
            }
        }
        copy.set("Parent", pages_id);

        target.objects.insert(new_id, Object::Dictionary(copy));
        self.assembler.kids.push(Object::Reference(new_id));
        Ok(new_id)
    }
}

/// Rebuild `source` as a fresh document containing every page in order,
/// carrying over `/Info`.
pub fn reassemble(source: &Document) -> Result<Document> {
    let mut assembler = PageAssembler::new();
    {
        let mut importer = assembler.importer(source);
        for page_id in source.get_pages().into_values() {
            importer.append(page_id)?;
        }
    }
    assembler.carry_info(source);
    Ok(assembler.finish())
}
