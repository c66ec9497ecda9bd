// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-engine — Stateless file-to-file PDF transformations.
//
// Provides the document model (two lopdf backends with an ordered fallback for
// encryption), overlay rendering and compositing (page numbers, watermarks),
// the transform operations on `PdfEngine`, and format converters (image, text
// and office documents to PDF).

pub mod artifact;
pub mod convert;
pub mod engine;
pub mod ops;
pub mod pdf;

// Re-export the primary types so callers can use `folio_engine::PdfEngine` etc.
pub use artifact::{Artifact, ArtifactStore, StagedOutput, TempArtifact};
pub use engine::PdfEngine;
pub use ops::{DocumentInfo, PageInfo, SplitOutput};
pub use pdf::{BackendKind, ContentStreamBackend, DocumentBackend, LoadedDocument, StructuralBackend};
