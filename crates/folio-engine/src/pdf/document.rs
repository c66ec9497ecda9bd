// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Loaded document — an opened lopdf document plus the facts the operations
// need about it: pages, effective geometry, metadata, encryption state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lopdf::{Document, Object, ObjectId, SaveOptions};
use tracing::{debug, info, instrument};

use folio_core::PageBox;
use folio_core::error::{FolioError, Result};

use super::page;

/// An opened PDF, owned by exactly one operation call.
///
/// For an encrypted file the original bytes are kept alongside the parsed
/// document: lopdf only materialises the objects of a file that opens with
/// the empty user password, so decrypting with a real password has to start
/// again from the bytes.
#[derive(Clone)]
pub struct LoadedDocument {
    inner: Document,
    source: PathBuf,
    encrypted_at_load: bool,
    sealed: bool,
    raw: Option<Arc<[u8]>>,
}

impl LoadedDocument {
    // -- Construction ---------------------------------------------------------

    /// Parse a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let data = std::fs::read(path_ref).map_err(|err| FolioError::unreadable(path_ref, err))?;
        Self::from_bytes(&data, path_ref)
    }

    /// Parse a PDF already read into memory. `source` is kept for diagnostics.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8], source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let inner = Document::load_mem(data).map_err(|err| FolioError::unreadable(&source, err))?;
        let mut doc = Self::from_document(inner, source);
        if doc.encrypted_at_load {
            doc.raw = Some(Arc::from(data));
        }
        Ok(doc)
    }

    pub fn from_document(inner: Document, source: impl Into<PathBuf>) -> Self {
        let encrypted_at_load = is_encrypted(&inner);
        let doc = Self {
            inner,
            source: source.into(),
            encrypted_at_load,
            sealed: false,
            raw: None,
        };
        debug!(
            pages = doc.page_count(),
            encrypted = encrypted_at_load,
            "PDF loaded"
        );
        doc
    }

    // -- Inspection -----------------------------------------------------------

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn document(&self) -> &Document {
        &self.inner
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.inner
    }

    /// Swap in a rebuilt document, keeping the source path.
    pub fn replace_document(&mut self, inner: Document) {
        self.inner = inner;
    }

    /// Page object ids in page order.
    pub fn page_ids(&self) -> Vec<ObjectId> {
        self.inner.get_pages().into_values().collect()
    }

    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Whether the document currently carries an encryption dictionary.
    pub fn is_encrypted(&self) -> bool {
        is_encrypted(&self.inner)
    }

    /// Encrypted and not readable without a password: lopdf could not open it
    /// with the empty user password, so pages and metadata are unavailable.
    pub fn is_locked(&self) -> bool {
        self.is_encrypted() && self.inner.encryption_state.is_none()
    }

    /// File bytes of an encrypted document, as read from disk.
    pub(crate) fn raw_bytes(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    /// Whether the document was encrypted when it was opened.
    pub fn was_encrypted(&self) -> bool {
        self.encrypted_at_load
    }

    /// True once a backend has encrypted the document for output. Sealed
    /// documents are serialised as-is.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn media_box(&self, page_id: ObjectId) -> PageBox {
        page::media_box(&self.inner, page_id)
    }

    pub fn rotation(&self, page_id: ObjectId) -> i64 {
        page::rotation(&self.inner, page_id)
    }

    /// Effective media boxes of all pages, in page order.
    pub fn page_boxes(&self) -> Vec<PageBox> {
        self.page_ids()
            .into_iter()
            .map(|id| self.media_box(id))
            .collect()
    }

    /// String entries of the `/Info` dictionary.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut entries = BTreeMap::new();
        let Ok(info) = self.inner.trailer.get(b"Info") else {
            return entries;
        };
        let Ok(dict) = page::resolve(&self.inner, info).as_dict() else {
            return entries;
        };
        for (key, value) in dict.iter() {
            if let Object::String(bytes, _) = page::resolve(&self.inner, value) {
                entries.insert(
                    String::from_utf8_lossy(key).into_owned(),
                    page::decode_text_string(bytes),
                );
            }
        }
        entries
    }

    /// Serialise the document as it stands.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.inner.save_to(&mut output).map_err(|err| {
            FolioError::RenderFailed(format!(
                "failed to serialise {}: {}",
                self.source.display(),
                err
            ))
        })?;
        Ok(output)
    }

    /// Serialise with non-stream objects packed into object streams and a
    /// cross-reference stream in place of the classic table.
    pub fn to_packed_bytes(&mut self) -> Result<Vec<u8>> {
        let options = SaveOptions::builder()
            .use_object_streams(true)
            .use_xref_streams(true)
            .compression_level(6)
            .build();
        let mut output = Vec::new();
        self.inner.save_with_options(&mut output, options).map_err(|err| {
            FolioError::RenderFailed(format!(
                "failed to serialise {}: {}",
                self.source.display(),
                err
            ))
        })?;
        Ok(output)
    }
}

/// lopdf's view, plus a lingering `/Encrypt` entry in the trailer.
fn is_encrypted(doc: &Document) -> bool {
    doc.is_encrypted() || doc.trailer.has(b"Encrypt")
}
