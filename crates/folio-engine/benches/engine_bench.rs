// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the folio-engine crate: page re-assembly and
// overlay rendering plus compositing on a synthetic 50-page document.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lopdf::Document;

use folio_core::{PageBox, PageNumberOptions, WatermarkPosition, WatermarkSpec};
use folio_engine::pdf::PageAssembler;
use folio_engine::pdf::compose::stamp_pages;
use folio_engine::pdf::overlay::{render_page_numbers, render_watermark};
use folio_engine::pdf::reassemble;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const PAGES: usize = 50;

/// A Letter document with `pages` pages of simple vector content.
fn synthetic_document(pages: usize) -> Document {
    let mut assembler = PageAssembler::new();
    for n in 0..pages {
        let content = format!("0.2 g 72 72 {} 400 re f", 100 + n).into_bytes();
        assembler.push_synthetic_page(
            &PageBox::from_size(612.0, 792.0),
            content,
            lopdf::Dictionary::new(),
        );
    }
    assembler.finish()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Rebuild the page tree page by page, as the structural backend does on
/// every write.
fn bench_reassemble(c: &mut Criterion) {
    let source = synthetic_document(PAGES);
    c.bench_function("reassemble (50 pages)", |b| {
        b.iter(|| black_box(reassemble(black_box(&source)).map(|doc| doc.objects.len())));
    });
}

/// Render a caption overlay and stamp it onto every page.
fn bench_page_numbers(c: &mut Criterion) {
    let source = synthetic_document(PAGES);
    let options = PageNumberOptions::default();
    c.bench_function("page numbers render+stamp (50 pages)", |b| {
        b.iter(|| {
            let mut target = source.clone();
            let overlay = render_page_numbers(PAGES, &options).ok();
            if let Some(overlay) = overlay {
                black_box(stamp_pages(&mut target, &overlay).ok());
            }
        });
    });
}

/// Render a tiled, rotated text watermark sized to every page.
fn bench_tiled_watermark(c: &mut Criterion) {
    let boxes = vec![PageBox::from_size(612.0, 792.0); PAGES];
    let mut spec = WatermarkSpec::text("CONFIDENTIAL");
    spec.position = WatermarkPosition::Tiled;
    spec.rotation = 30.0;
    c.bench_function("tiled watermark render (50 pages)", |b| {
        b.iter(|| black_box(render_watermark(black_box(&boxes), &spec).map(|doc| doc.objects.len())));
    });
}

criterion_group!(benches, bench_reassemble, bench_page_numbers, bench_tiled_watermark);
criterion_main!(benches);
