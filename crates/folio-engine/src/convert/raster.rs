// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster image → single-page PDF.

use std::path::Path;

use image::{DynamicImage, RgbImage};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, instrument};

use folio_core::error::{FolioError, Result};

/// One point per pixel.
const IMAGE_DPI: f32 = 72.0;

/// Render `data` onto a page exactly the image's pixel size, with any alpha
/// channel composited onto white.
#[instrument(skip(data), fields(path = %path.display(), bytes_len = data.len()))]
pub fn image_to_pdf(path: &Path, data: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(data).map_err(|err| FolioError::unreadable(path, err))?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(FolioError::unreadable(path, "image has no pixels"));
    }

    let rgb = flatten_onto_white(decoded);
    let raw = RawImage {
        pixels: RawImageData::U8(rgb.into_raw()),
        width: width as usize,
        height: height as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };

    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Image".to_string());
    let mut doc = PdfDocument::new(&title);
    let xobject_id = doc.add_image(&raw);

    let ops = vec![Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Pt(0.0)),
            scale_x: None,
            scale_y: None,
            dpi: Some(IMAGE_DPI),
            rotate: None,
        },
    }];
    let page = PdfPage::new(pt_to_mm(width as f32), pt_to_mm(height as f32), ops);
    doc.with_pages(vec![page]);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
    debug!(width, height, warnings = warnings.len(), "Image page rendered");
    Ok(output)
}

pub(crate) fn pt_to_mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

/// Drop the alpha channel by blending every pixel over white.
fn flatten_onto_white(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |channel: u8| -> u8 {
            let alpha = a as u32;
            ((channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}
