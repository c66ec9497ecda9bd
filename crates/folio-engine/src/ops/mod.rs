// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transform operations, implemented on `PdfEngine`.
//
// Each operation validates its parameters before touching the filesystem,
// opens its inputs fresh, and writes its result through a staged output.
// Operations never call one another.

mod geometry;
mod info;
mod pages;
mod rewrite;
mod security;
mod stamp;

pub use info::{DocumentInfo, PageInfo};
pub use pages::SplitOutput;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::warn;

use folio_core::error::{FolioError, Result};

/// Mark which of `page_count` pages an operation applies to. `None` selects
/// every page; listed numbers outside `1..=page_count` are skipped.
pub(crate) fn page_selection(page_count: usize, pages: Option<&[u32]>) -> Vec<bool> {
    let Some(pages) = pages else {
        return vec![true; page_count];
    };
    let mut selected = vec![false; page_count];
    for &number in pages {
        match (number as usize).checked_sub(1) {
            Some(index) if index < page_count => selected[index] = true,
            _ => warn!(page = number, page_count, "Page outside document, skipped"),
        }
    }
    selected
}

/// Reject an explicit page list that names nothing.
pub(crate) fn require_pages(pages: &[u32], operation: &str) -> Result<()> {
    if pages.is_empty() {
        return Err(FolioError::InvalidParameters(format!(
            "{operation} needs at least one page number"
        )));
    }
    Ok(())
}

pub(crate) fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| FolioError::RenderFailed(format!("page {:?} not writable: {}", page_id, err)))
}
