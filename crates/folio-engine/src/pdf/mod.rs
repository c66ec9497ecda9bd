// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF document model — loading, page assembly, backends, overlays, compositing.

pub mod assemble;
pub mod backend;
pub mod compose;
pub mod document;
pub mod fallback;
pub mod font;
pub mod overlay;
pub mod page;

pub use assemble::{PageAssembler, reassemble};
pub use backend::{BackendKind, ContentStreamBackend, DocumentBackend, StructuralBackend};
pub use document::LoadedDocument;
