// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The engine value — configuration plus the artifact store. Operations are
// implemented on `PdfEngine` in the `ops` and `convert` modules; the engine
// itself holds no per-call state.

use std::path::Path;

use tracing::{debug, error};

use folio_core::EngineConfig;
use folio_core::error::{FolioError, Result};

use crate::artifact::{Artifact, ArtifactStore, StagedOutput};
use crate::pdf::{DocumentBackend, LoadedDocument, StructuralBackend};

/// Stateless PDF transformation engine.
///
/// Every operation opens its inputs fresh, writes exactly one output (or one
/// directory of outputs for split) and removes its intermediates before
/// returning. A single engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct PdfEngine {
    config: EngineConfig,
    artifacts: ArtifactStore,
}

impl Default for PdfEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PdfEngine {
    pub fn new(config: EngineConfig) -> Self {
        let artifacts = ArtifactStore::new(config.temp_dir.clone());
        Self { config, artifacts }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generated names and scoped intermediates under the temp directory.
    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    // -- Input handling -------------------------------------------------------

    /// Check that `path` is a readable file within the configured size limit.
    pub(crate) fn check_input(&self, path: &Path) -> Result<()> {
        let metadata = std::fs::metadata(path).map_err(|err| FolioError::unreadable(path, err))?;
        if !metadata.is_file() {
            return Err(FolioError::unreadable(path, "not a regular file"));
        }
        let size = metadata.len();
        match self.config.max_input_bytes {
            Some(limit) if size > limit => Err(FolioError::InputTooLarge {
                path: path.to_path_buf(),
                size,
                limit,
            }),
            _ => Ok(()),
        }
    }

    /// Open an input for a page-level operation. Encrypted inputs must be
    /// unlocked first.
    pub(crate) fn open_plain(&self, path: &Path) -> Result<LoadedDocument> {
        self.check_input(path)?;
        let doc = StructuralBackend.open(path)?;
        if doc.is_encrypted() {
            return Err(FolioError::unreadable(
                path,
                "document is password protected; unlock it first",
            ));
        }
        Ok(doc)
    }

    // -- Output handling ------------------------------------------------------

    /// Serialise `doc` through `backend` and move it onto `output`.
    pub(crate) fn write_output(
        &self,
        backend: &dyn DocumentBackend,
        doc: &mut LoadedDocument,
        output: &Path,
    ) -> Result<Artifact> {
        let bytes = backend.serialize(doc).inspect_err(|err| {
            error!(
                backend = %backend.kind(),
                source = %doc.source().display(),
                error = %err,
                "Serialisation failed"
            );
        })?;
        debug!(bytes = bytes.len(), output = %output.display(), "Writing output");
        StagedOutput::commit(output, &bytes)
    }
}
