// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain text → paginated PDF.
//
// Each non-blank input line is a paragraph, word-wrapped to the text column.
// Blank lines become fixed-height spacers. A new page starts whenever the
// next line would cross the bottom margin.

use printpdf::{
    BuiltinFont, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use tracing::{debug, instrument};

use folio_core::error::Result;
use folio_core::{PaperSize, TextLayout};

use super::raster::pt_to_mm;
use crate::pdf::font::wrap_to_width;

/// One laid-out page: baseline positions and the text drawn there.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct LaidOutPage {
    pub lines: Vec<(f32, String)>,
}

/// Break `text` into pages of `page_width` × `page_height` points.
pub(crate) fn paginate(
    text: &str,
    layout: &TextLayout,
    page_width: f32,
    page_height: f32,
) -> Vec<LaidOutPage> {
    let column = (page_width - 2.0 * layout.margin).max(layout.font_size);
    let top = page_height - layout.margin;
    let bottom = layout.margin;

    let mut pages = Vec::new();
    let mut current = LaidOutPage::default();
    let mut cursor = top;

    for line in text.lines() {
        if line.trim().is_empty() {
            cursor -= layout.spacer_height;
            continue;
        }
        for wrapped in wrap_to_width(line.trim_end(), layout.font_size, column) {
            if cursor - layout.line_height < bottom {
                if !current.lines.is_empty() {
                    pages.push(std::mem::take(&mut current));
                }
                cursor = top;
            }
            cursor -= layout.line_height;
            current.lines.push((cursor, wrapped));
        }
    }

    if !current.lines.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

/// Render `text` onto Letter pages using the builtin Helvetica font.
#[instrument(skip(text, layout), fields(text_len = text.len()))]
pub fn text_to_pdf(text: &str, title: &str, layout: &TextLayout) -> Result<Vec<u8>> {
    let (width, height) = PaperSize::Letter.dimensions_pt();
    let laid_out = paginate(text, layout, width, height);

    let mut doc = PdfDocument::new(title);
    let pages: Vec<PdfPage> = laid_out
        .iter()
        .map(|page| {
            let mut ops = Vec::with_capacity(page.lines.len() * 5);
            for (baseline, line) in &page.lines {
                ops.extend([
                    Op::StartTextSection,
                    Op::SetTextCursor {
                        pos: Point {
                            x: Pt(layout.margin),
                            y: Pt(*baseline),
                        },
                    },
                    Op::SetFontSizeBuiltinFont {
                        size: Pt(layout.font_size),
                        font: BuiltinFont::Helvetica,
                    },
                    Op::WriteTextBuiltinFont {
                        items: vec![TextItem::Text(line.clone())],
                        font: BuiltinFont::Helvetica,
                    },
                    Op::EndTextSection,
                ]);
            }
            PdfPage::new(pt_to_mm(width), pt_to_mm(height), ops)
        })
        .collect();
    doc.with_pages(pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
    debug!(pages = laid_out.len(), warnings = warnings.len(), "Text layout complete");
    Ok(output)
}
