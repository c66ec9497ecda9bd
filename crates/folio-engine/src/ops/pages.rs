// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-set operations — merge, split, extract, remove. All of them build a
// fresh page tree with the structural page assembler.

use std::path::{Path, PathBuf};

use lopdf::ObjectId;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use folio_core::PageRange;
use folio_core::error::{FolioError, Result};

use super::{page_selection, require_pages};
use crate::artifact::{Artifact, StagedOutput};
use crate::engine::PdfEngine;
use crate::pdf::{LoadedDocument, PageAssembler};

/// Result of a split: the output directory and the parts written into it, in
/// range order.
#[derive(Debug, Clone, Serialize)]
pub struct SplitOutput {
    pub dir: PathBuf,
    pub parts: Vec<Artifact>,
}

impl PdfEngine {
    /// Concatenate `inputs` in order into one document. `/Info` is taken from
    /// the first input.
    #[instrument(skip_all, fields(inputs = inputs.len(), output = %output.as_ref().display()))]
    pub fn merge<P: AsRef<Path>>(&self, inputs: &[P], output: impl AsRef<Path>) -> Result<Artifact> {
        if inputs.is_empty() {
            return Err(FolioError::InvalidParameters(
                "merge needs at least one input document".into(),
            ));
        }
        info!(inputs = inputs.len(), "Merging PDFs");

        let mut assembler = PageAssembler::new();
        for (index, input) in inputs.iter().enumerate() {
            let source = self.open_plain(input.as_ref())?;
            if index == 0 {
                assembler.carry_info(source.document());
            }
            let mut importer = assembler.importer(source.document());
            for page_id in source.page_ids() {
                importer.append(page_id)?;
            }
            debug!(input = index + 1, pages = source.page_count(), "Input appended");
        }

        let total = assembler.page_count();
        let artifact = commit(assembler, output.as_ref())?;
        info!(pages = total, "Merge complete");
        Ok(artifact)
    }

    /// Write one document per range into `output_dir`, named
    /// `split_{n}.pdf` after the range's position in `ranges`.
    ///
    /// The end of each range is clamped to the page count. Ranges that fall
    /// wholly outside the document are dropped without error, so the result
    /// can hold fewer parts than `ranges`.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), ranges = ranges.len()))]
    pub fn split(
        &self,
        input: impl AsRef<Path>,
        ranges: &[PageRange],
        output_dir: impl AsRef<Path>,
    ) -> Result<SplitOutput> {
        if ranges.is_empty() {
            return Err(FolioError::InvalidRange("no page ranges given".into()));
        }
        for range in ranges {
            range.validate()?;
        }

        let source = self.open_plain(input.as_ref())?;
        let total = source.page_count();
        let page_ids = source.page_ids();
        let dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        info!(pages = total, "Splitting PDF");

        let mut parts: Vec<Artifact> = Vec::new();
        for (index, range) in ranges.iter().enumerate() {
            let Some(indices) = range.resolve(total) else {
                warn!(range = %range, pages = total, "Range outside document, dropped");
                continue;
            };
            let destination = dir.join(format!("split_{}.pdf", index + 1));
            let selected = indices.map(|i| page_ids[i]);

            match write_pages(&source, selected, &destination) {
                Ok(artifact) => parts.push(artifact),
                Err(err) => {
                    discard(&parts);
                    return Err(err);
                }
            }
        }

        info!(parts = parts.len(), "Split complete");
        Ok(SplitOutput { dir, parts })
    }

    /// Build a document from the listed pages, in the listed order.
    /// Duplicates are kept; numbers outside the document are skipped.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), requested = pages.len()))]
    pub fn extract_pages(
        &self,
        input: impl AsRef<Path>,
        pages: &[u32],
        output: impl AsRef<Path>,
    ) -> Result<Artifact> {
        require_pages(pages, "extract")?;

        let source = self.open_plain(input.as_ref())?;
        let page_ids = source.page_ids();
        let selected: Vec<ObjectId> = pages
            .iter()
            .filter_map(|&number| {
                let found = (number as usize)
                    .checked_sub(1)
                    .and_then(|index| page_ids.get(index).copied());
                if found.is_none() {
                    warn!(page = number, pages = page_ids.len(), "Page outside document, skipped");
                }
                found
            })
            .collect();

        if selected.is_empty() {
            return Err(FolioError::InvalidParameters(format!(
                "none of the requested pages exist in a {}-page document",
                page_ids.len()
            )));
        }

        info!(pages = selected.len(), "Extracting pages");
        write_pages(&source, selected, output.as_ref())
    }

    /// Build a document from every page not listed in `pages`.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), requested = pages.len()))]
    pub fn remove_pages(
        &self,
        input: impl AsRef<Path>,
        pages: &[u32],
        output: impl AsRef<Path>,
    ) -> Result<Artifact> {
        require_pages(pages, "remove")?;

        let source = self.open_plain(input.as_ref())?;
        let removed = page_selection(source.page_count(), Some(pages));
        let kept: Vec<ObjectId> = source
            .page_ids()
            .into_iter()
            .zip(&removed)
            .filter(|(_, removed)| !**removed)
            .map(|(id, _)| id)
            .collect();

        if kept.is_empty() {
            return Err(FolioError::InvalidParameters(
                "removing every page would leave an empty document".into(),
            ));
        }

        info!(kept = kept.len(), removed = source.page_count() - kept.len(), "Removing pages");
        write_pages(&source, kept, output.as_ref())
    }
}

/// Assemble `pages` of `source` into a new document and persist it.
fn write_pages(
    source: &LoadedDocument,
    pages: impl IntoIterator<Item = ObjectId>,
    destination: &Path,
) -> Result<Artifact> {
    let mut assembler = PageAssembler::new();
    assembler.carry_info(source.document());
    {
        let mut importer = assembler.importer(source.document());
        for page_id in pages {
            importer.append(page_id)?;
        }
    }
    commit(assembler, destination)
}

fn commit(assembler: PageAssembler, destination: &Path) -> Result<Artifact> {
    let mut doc = LoadedDocument::from_document(assembler.finish(), destination);
    let bytes = doc.to_bytes()?;
    StagedOutput::commit(destination, &bytes)
}

/// Remove parts already written by a split that then failed.
fn discard(parts: &[Artifact]) {
    for part in parts {
        if let Err(err) = std::fs::remove_file(&part.path) {
            warn!(path = %part.path.display(), error = %err, "Could not remove partial split output");
        }
    }
}
