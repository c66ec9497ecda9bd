// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Office document → PDF through an external headless converter, with a
// single-page placeholder when the converter cannot be used.

use std::path::Path;
use std::process::Command;

use printpdf::{
    BuiltinFont, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use tracing::{debug, info, instrument, warn};

use folio_core::error::{FolioError, Result};
use folio_core::{OfficeConfig, PaperSize};

use super::raster::pt_to_mm;

/// Convert `input` with the configured program, writing into `scratch`.
/// With `placeholder_fallback` set, every converter failure is absorbed and
/// a placeholder page is returned instead.
#[instrument(skip_all, fields(input = %input.display(), program = %config.program))]
pub fn office_to_pdf(config: &OfficeConfig, input: &Path, scratch: &Path) -> Result<Vec<u8>> {
    match run_converter(&config.program, input, scratch) {
        Ok(bytes) => {
            info!(bytes = bytes.len(), "Office document converted");
            Ok(bytes)
        }
        Err(err) if config.placeholder_fallback => {
            warn!(error = %err, "Converter unavailable, emitting placeholder page");
            Ok(placeholder_pdf(input))
        }
        Err(err) => Err(err),
    }
}

/// `<program> --headless --convert-to pdf --outdir <scratch> <input>`
fn run_converter(program: &str, input: &Path, scratch: &Path) -> Result<Vec<u8>> {
    let result = Command::new(program)
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(scratch)
        .arg(input)
        .output()
        .map_err(|err| {
            FolioError::ExternalToolUnavailable(format!("failed to execute {program}: {err}"))
        })?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(FolioError::ExternalToolUnavailable(format!(
            "{program} failed (exit code {}): {}",
            result
                .status
                .code()
                .map_or_else(|| "unknown".to_string(), |c| c.to_string()),
            stderr.trim()
        )));
    }

    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let produced = scratch.join(format!("{stem}.pdf"));
    let bytes = std::fs::read(&produced).map_err(|err| {
        FolioError::ExternalToolUnavailable(format!(
            "{program} produced no {}: {err}",
            produced.display()
        ))
    })?;
    if !bytes.starts_with(b"%PDF") {
        return Err(FolioError::ExternalToolUnavailable(format!(
            "{program} output is not a PDF"
        )));
    }
    debug!(path = %produced.display(), "Converter output read");
    Ok(bytes)
}

/// A Letter page naming the original file and stating the degraded
/// conversion.
pub fn placeholder_pdf(input: &Path) -> Vec<u8> {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    let (width, height) = PaperSize::Letter.dimensions_pt();

    let lines = [
        (18.0, format!("Converted from: {file_name}")),
        (
            11.0,
            "Full conversion was not available for this document.".to_string(),
        ),
        (
            11.0,
            "This page is a placeholder produced in place of the original content.".to_string(),
        ),
    ];

    let mut ops = Vec::new();
    let mut baseline = height - 72.0;
    for (size, text) in lines {
        baseline -= size * 1.6;
        ops.extend([
            Op::StartTextSection,
            Op::SetTextCursor {
                pos: Point {
                    x: Pt(72.0),
                    y: Pt(baseline),
                },
            },
            Op::SetFontSizeBuiltinFont {
                size: Pt(size),
                font: BuiltinFont::Helvetica,
            },
            Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(text)],
                font: BuiltinFont::Helvetica,
            },
            Op::EndTextSection,
        ]);
    }

    let mut doc = PdfDocument::new(&file_name);
    doc.with_pages(vec![PdfPage::new(pt_to_mm(width), pt_to_mm(height), ops)]);
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}

#[cfg(test)]
mod tests {
    use lopdf::Document;

    use super::*;

    fn missing_program() -> OfficeConfig {
        OfficeConfig {
            program: "folio-test-no-such-converter".to_string(),
            placeholder_fallback: true,
        }
    }

    #[test]
    fn missing_converter_falls_back_to_placeholder() {
        let scratch = tempfile::tempdir().unwrap();
        let bytes = office_to_pdf(&missing_program(), Path::new("report.docx"), scratch.path())
            .unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn missing_converter_without_fallback_is_an_error() {
        let scratch = tempfile::tempdir().unwrap();
        let config = OfficeConfig {
            placeholder_fallback: false,
            ..missing_program()
        };
        let err = office_to_pdf(&config, Path::new("report.docx"), scratch.path()).unwrap_err();
        assert!(matches!(err, FolioError::ExternalToolUnavailable(_)));
    }

    #[cfg(unix)]
    #[test]
    fn failing_converter_is_absorbed() {
        let scratch = tempfile::tempdir().unwrap();
        let config = OfficeConfig {
            program: "false".to_string(),
            placeholder_fallback: true,
        };
        let bytes = office_to_pdf(&config, Path::new("sheet.xlsx"), scratch.path()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
