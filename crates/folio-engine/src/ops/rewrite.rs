// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Whole-file rewrites — compress and repair, both on the content-stream
// backend.

use std::path::Path;

use tracing::{info, instrument};

use folio_core::CompressionQuality;
use folio_core::error::Result;

use crate::artifact::Artifact;
use crate::engine::PdfEngine;
use crate::pdf::{ContentStreamBackend, DocumentBackend};

impl PdfEngine {
    /// Regenerate every stream and apply the tier's image quality. The `Low`
    /// tier also drops document metadata.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), quality = ?quality))]
    pub fn compress(
        &self,
        input: impl AsRef<Path>,
        quality: CompressionQuality,
        output: impl AsRef<Path>,
    ) -> Result<Artifact> {
        let input = input.as_ref();
        self.check_input(input)?;

        let original_size = std::fs::metadata(input)?.len();
        let backend = ContentStreamBackend::with_profile(quality.profile());
        let mut doc = backend.open(input)?;
        let artifact = self.write_output(&backend, &mut doc, output.as_ref())?;

        info!(
            original_size,
            compressed_size = artifact.size,
            "Compression complete"
        );
        Ok(artifact)
    }

    /// Parse and re-serialise the document. Success means the file was
    /// accepted and rewritten, not that its content is intact.
    #[instrument(skip_all, fields(input = %input.as_ref().display()))]
    pub fn repair(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<Artifact> {
        let input = input.as_ref();
        self.check_input(input)?;

        let backend = ContentStreamBackend::default();
        let mut doc = backend.open(input)?;
        let artifact = self.write_output(&backend, &mut doc, output.as_ref())?;

        info!(pages = doc.page_count(), "Repair complete");
        Ok(artifact)
    }
}
