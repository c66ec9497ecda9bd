// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Overlay renderer — synthesises page-number and watermark documents that the
// compositor stamps onto a source document page by page.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::{debug, info, instrument};

use folio_core::error::{FolioError, Result};
use folio_core::{
    PageBox, PageNumberOptions, PaperSize, WatermarkContent, WatermarkPosition, WatermarkSpec,
};

use super::assemble::PageAssembler;
use super::font::{encode_win_ansi, helvetica_dict, text_width};

/// Font size of page-number captions.
pub const NUMBER_FONT_SIZE: f32 = 12.0;
/// Font size of text watermarks.
pub const WATERMARK_FONT_SIZE: f32 = 60.0;
/// Grey level of text watermarks.
pub const WATERMARK_GRAY: f32 = 0.5;
/// Edge length of image watermarks, and the tiling step.
pub const WATERMARK_CELL: f32 = 200.0;

// -- Page numbers -------------------------------------------------------------

/// One caption page per source page, on a fixed Letter canvas.
#[instrument(skip(options), fields(position = options.position.as_str()))]
pub fn render_page_numbers(page_count: usize, options: &PageNumberOptions) -> Result<Document> {
    let canvas = PaperSize::Letter.page_box();
    let (x, y) = options.position.anchor();

    let mut assembler = PageAssembler::new();
    let font_id = assembler.add_object(helvetica_dict());

    for index in 0..page_count {
        let caption = options.caption(index, page_count);
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), num(NUMBER_FONT_SIZE)]),
            Operation::new("Td", vec![num(x), num(y)]),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(&caption))]),
            Operation::new("ET", vec![]),
        ];
        assembler.push_synthetic_page(&canvas, encode(ops)?, font_resources(font_id));
    }

    info!(pages = page_count, "Page-number overlay rendered");
    Ok(assembler.finish())
}

// -- Watermarks ---------------------------------------------------------------

/// One watermark page per entry in `page_boxes`, each sized to match. An empty
/// slice yields a single Letter-sized page.
#[instrument(skip_all, fields(pages = page_boxes.len(), position = ?spec.position))]
pub fn render_watermark(page_boxes: &[PageBox], spec: &WatermarkSpec) -> Result<Document> {
    let content = spec.content()?;
    let fallback = [PaperSize::Letter.page_box()];
    let boxes = if page_boxes.is_empty() {
        &fallback[..]
    } else {
        page_boxes
    };

    let mut assembler = PageAssembler::new();
    let mut resources = dictionary! {
        "ExtGState" => dictionary! {
            "GS1" => dictionary! {
                "Type" => "ExtGState",
                "ca" => spec.opacity,
                "CA" => spec.opacity,
            },
        },
    };
    let mark = match content {
        WatermarkContent::Text(text) => {
            let font_id = assembler.add_object(helvetica_dict());
            resources.set("Font", dictionary! { "F1" => font_id });
            Mark::Text(text)
        }
        WatermarkContent::Image(path) => {
            let image_id = embed_image(&mut assembler, path)?;
            resources.set("XObject", dictionary! { "Im1" => image_id });
            Mark::Image
        }
    };

    for page_box in boxes {
        let size = PageBox::from_size(page_box.width(), page_box.height());
        let ops = watermark_ops(&size, spec, &mark);
        assembler.push_synthetic_page(&size, encode(ops)?, resources.clone());
    }

    info!(pages = boxes.len(), "Watermark overlay rendered");
    Ok(assembler.finish())
}

enum Mark<'a> {
    Text(&'a str),
    Image,
}

/// Draw operations for one watermark page: opacity, optional rotation about
/// the page centre, then the mark at every anchor.
fn watermark_ops(size: &PageBox, spec: &WatermarkSpec, mark: &Mark<'_>) -> Vec<Operation> {
    let (width, height) = (size.width(), size.height());
    let (cx, cy) = (width / 2.0, height / 2.0);

    let mut ops = vec![
        Operation::new("q", vec![]),
        Operation::new("gs", vec!["GS1".into()]),
    ];

    if spec.rotation != 0.0 {
        let (sin, cos) = spec.rotation.to_radians().sin_cos();
        ops.push(cm(1.0, 0.0, 0.0, 1.0, cx, cy));
        ops.push(cm(cos, sin, -sin, cos, 0.0, 0.0));
        ops.push(cm(1.0, 0.0, 0.0, 1.0, -cx, -cy));
    }

    for (x, y) in anchors(width, height, spec.position) {
        match mark {
            Mark::Text(text) => {
                let half = text_width(text, WATERMARK_FONT_SIZE) / 2.0;
                ops.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("g", vec![num(WATERMARK_GRAY)]),
                    Operation::new("Tf", vec!["F1".into(), num(WATERMARK_FONT_SIZE)]),
                    Operation::new("Td", vec![num(x - half), num(y)]),
                    Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
                    Operation::new("ET", vec![]),
                ]);
            }
            Mark::Image => {
                let half = WATERMARK_CELL / 2.0;
                ops.extend([
                    Operation::new("q", vec![]),
                    cm(WATERMARK_CELL, 0.0, 0.0, WATERMARK_CELL, x - half, y - half),
                    Operation::new("Do", vec!["Im1".into()]),
                    Operation::new("Q", vec![]),
                ]);
            }
        }
    }

    ops.push(Operation::new("Q", vec![]));
    ops
}

/// Draw anchors: the page centre, or a 200-unit grid from the origin.
pub fn anchors(width: f32, height: f32, position: WatermarkPosition) -> Vec<(f32, f32)> {
    match position {
        WatermarkPosition::Center => vec![(width / 2.0, height / 2.0)],
        WatermarkPosition::Tiled => {
            let step = WATERMARK_CELL as usize;
            let columns = (0..width.max(0.0) as usize).step_by(step);
            columns
                .flat_map(|x| {
                    (0..height.max(0.0) as usize)
                        .step_by(step)
                        .map(move |y| (x as f32, y as f32))
                })
                .collect()
        }
    }
}

/// Decode an image and add it as an RGB image XObject, alpha as a soft mask.
fn embed_image(assembler: &mut PageAssembler, path: &Path) -> Result<ObjectId> {
    let decoded = image::open(path).map_err(|err| FolioError::unreadable(path, err))?;
    let (width, height) = (decoded.width() as i64, decoded.height() as i64);
    debug!(width, height, "Watermark image decoded");

    let mut image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width,
        "Height" => height,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };

    if decoded.color().has_alpha() {
        let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p[3]).collect();
        let mask_id = assembler.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            alpha,
        ));
        image_dict.set("SMask", mask_id);
    }

    let mut stream = Stream::new(image_dict, decoded.to_rgb8().into_raw());
    if let Err(err) = stream.compress() {
        debug!(error = %err, "Image stream left uncompressed");
    }
    Ok(assembler.add_object(stream))
}

// -- Content helpers ----------------------------------------------------------

fn cm(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Operation {
    Operation::new(
        "cm",
        [a, b, c, d, e, f].into_iter().map(num).collect(),
    )
}

/// Whole numbers are written as integers.
fn num(value: f32) -> Object {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        Object::Integer(value as i64)
    } else {
        Object::Real(value)
    }
}

fn font_resources(font_id: ObjectId) -> Dictionary {
    dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    }
}

fn encode(operations: Vec<Operation>) -> Result<Vec<u8>> {
    Content { operations }
        .encode()
        .map_err(|err| FolioError::RenderFailed(format!("overlay content stream: {}", err)))
}
