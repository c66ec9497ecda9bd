// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Overlay operations: page numbers and watermarks.
//
// The overlay is rendered, written to a scoped temp file, re-opened, and
// stamped onto the source page by page. The temp file is removed when the
// operation returns, whatever the outcome.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, info, instrument};

use folio_core::error::{FolioError, Result};
use folio_core::{PageNumberOptions, WatermarkSpec};

use crate::artifact::{Artifact, TempArtifact};
use crate::engine::PdfEngine;
use crate::pdf::compose::stamp_pages;
use crate::pdf::overlay::{render_page_numbers, render_watermark};
use crate::pdf::{LoadedDocument, StructuralBackend};

impl PdfEngine {
    /// Stamp a caption on every page. Captions are laid out on a fixed
    /// Letter canvas whatever the size of the source pages.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), position = options.position.as_str()))]
    pub fn add_page_numbers(
        &self,
        input: impl AsRef<Path>,
        options: &PageNumberOptions,
        output: impl AsRef<Path>,
    ) -> Result<Artifact> {
        let mut doc = self.open_plain(input.as_ref())?;
        let overlay = render_page_numbers(doc.page_count(), options)?;
        self.apply_overlay(&mut doc, overlay, output.as_ref())
    }

    /// Stamp a text or image watermark on every page, sized to each page.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), position = ?spec.position))]
    pub fn add_watermark(
        &self,
        input: impl AsRef<Path>,
        spec: &WatermarkSpec,
        output: impl AsRef<Path>,
    ) -> Result<Artifact> {
        spec.content()?;

        let mut doc = self.open_plain(input.as_ref())?;
        if let Some(image) = &spec.image {
            self.check_input(image)?;
        }
        let overlay = render_watermark(&doc.page_boxes(), spec)?;
        self.apply_overlay(&mut doc, overlay, output.as_ref())
    }

    fn apply_overlay(
        &self,
        doc: &mut LoadedDocument,
        overlay: Document,
        output: &Path,
    ) -> Result<Artifact> {
        let (_scratch, overlay) = self.stage_overlay(overlay)?;
        let stamped = stamp_pages(doc.document_mut(), overlay.document())?;
        info!(pages = stamped, "Overlay applied");
        self.write_output(&StructuralBackend, doc, output)
    }

    /// Round-trip the overlay through a temp file so the compositor works on
    /// exactly what a reader would parse.
    fn stage_overlay(&self, mut overlay: Document) -> Result<(TempArtifact, LoadedDocument)> {
        let mut bytes = Vec::new();
        overlay
            .save_to(&mut bytes)
            .map_err(|err| FolioError::RenderFailed(format!("overlay serialisation: {}", err)))?;

        let mut scratch = self.artifacts().scratch_file("pdf")?;
        scratch.write(&bytes)?;
        debug!(path = %scratch.path().display(), bytes = bytes.len(), "Overlay staged");

        let reopened = LoadedDocument::open(scratch.path())?;
        Ok((scratch, reopened))
    }
}
