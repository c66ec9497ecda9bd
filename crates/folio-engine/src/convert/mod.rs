// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format conversion — images, plain text and office documents to PDF,
// dispatched on the input's file extension.

pub mod office;
pub mod raster;
pub mod text;

use std::path::Path;

use tracing::{info, instrument};

use folio_core::InputFormat;
use folio_core::error::Result;

use crate::artifact::{Artifact, StagedOutput};
use crate::engine::PdfEngine;

impl PdfEngine {
    /// Convert a non-PDF input to PDF. Unknown extensions fail with
    /// `UnsupportedFormat` before the file is read.
    #[instrument(skip_all, fields(input = %input.as_ref().display()))]
    pub fn convert_to_pdf(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<Artifact> {
        let input = input.as_ref();
        let format = InputFormat::from_path(input)?;
        self.check_input(input)?;
        info!(format = ?format, "Converting to PDF");

        let bytes = match format {
            InputFormat::Image => raster::image_to_pdf(input, &std::fs::read(input)?)?,
            InputFormat::Text => {
                let data = std::fs::read(input)?;
                let title = input
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                text::text_to_pdf(
                    &String::from_utf8_lossy(&data),
                    &title,
                    &self.config().text_layout,
                )?
            }
            InputFormat::Office => {
                let scratch = self.artifacts().scratch_dir()?;
                office::office_to_pdf(&self.config().office, input, scratch.path())?
            }
        };

        StagedOutput::commit(output.as_ref(), &bytes)
    }
}
