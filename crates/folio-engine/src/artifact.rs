// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Artifact lifecycle: staged outputs, scoped intermediates, and generated names.
//
// Operations never write to their declared output path directly. They stage
// the serialised document next to it and rename it into place once complete,
// so a failed operation leaves nothing behind. Intermediates (overlay PDFs,
// converter scratch directories) live under the engine's temp directory and
// are removed when their handle drops.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info};
use uuid::Uuid;

use folio_core::error::{FolioError, Result};

// -- Produced artifacts -------------------------------------------------------

/// A file produced by an operation. Owned by the caller once returned.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub size: u64,
    /// SHA-256 of the file contents, hex-encoded.
    pub sha256: String,
    /// When the artifact was persisted. Retention is the caller's concern.
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    /// Describe a file that already exists on disk.
    pub fn describe(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = std::fs::read(&path)?;
        Ok(Self {
            size: bytes.len() as u64,
            sha256: fingerprint(&bytes),
            created_at: Utc::now(),
            path,
        })
    }
}

/// Hex-encoded SHA-256 of a byte slice.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

// -- Staged output ------------------------------------------------------------

/// An output file being written. Lives as a temp file in the destination's
/// directory until [`StagedOutput::persist`] renames it onto the destination.
/// Dropping it without persisting removes the temp file.
pub struct StagedOutput {
    file: NamedTempFile,
    destination: PathBuf,
}

impl StagedOutput {
    /// Stage a new output for `destination`, creating its parent directory.
    pub fn new(destination: impl Into<PathBuf>) -> Result<Self> {
        let destination = destination.into();
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let file = tempfile::Builder::new()
            .prefix(".folio-staged-")
            .suffix(".part")
            .tempfile_in(&parent)?;

        Ok(Self { file, destination })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.file.as_file_mut().write_all(bytes)?;
        Ok(())
    }

    /// Flush and move the staged file onto its destination.
    pub fn persist(mut self) -> Result<Artifact> {
        self.file.as_file_mut().flush()?;
        self.file
            .persist(&self.destination)
            .map_err(|err| FolioError::Io(err.error))?;

        let artifact = Artifact::describe(&self.destination)?;
        debug!(
            path = %artifact.path.display(),
            size = artifact.size,
            "Output persisted"
        );
        Ok(artifact)
    }

    /// Stage `bytes` and persist them in one step.
    pub fn commit(destination: impl Into<PathBuf>, bytes: &[u8]) -> Result<Artifact> {
        let mut staged = Self::new(destination)?;
        staged.write_all(bytes)?;
        staged.persist()
    }
}

// -- Scoped intermediates -----------------------------------------------------

enum Scratch {
    File(NamedTempFile),
    Dir(TempDir),
}

/// An intermediate file or directory owned by a single operation. Deleted
/// when dropped, on success and failure alike.
pub struct TempArtifact {
    scratch: Scratch,
}

impl TempArtifact {
    pub fn path(&self) -> &Path {
        match &self.scratch {
            Scratch::File(file) => file.path(),
            Scratch::Dir(dir) => dir.path(),
        }
    }

    /// Overwrite the file's contents. Fails for directory artifacts.
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        match &mut self.scratch {
            Scratch::File(file) => {
                let handle = file.as_file_mut();
                handle.set_len(0)?;
                handle.write_all(bytes)?;
                handle.flush()?;
                Ok(())
            }
            Scratch::Dir(_) => Err(FolioError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "temp artifact is a directory",
            ))),
        }
    }
}

// -- Generated names ----------------------------------------------------------

/// Flat namespace of generated names under the engine's temp directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reserve a unique `<uuid>.<extension>` path. Nothing is created.
    pub fn allocate(&self, extension: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self
            .root
            .join(format!("{}.{}", Uuid::new_v4(), extension.trim_start_matches('.')));
        info!(path = %path.display(), "Allocated artifact path");
        Ok(path)
    }

    /// Reserve a unique directory path, for multi-file outputs.
    pub fn allocate_dir(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        Ok(self.root.join(Uuid::new_v4().to_string()))
    }

    /// Create a scoped temp file with the given extension.
    pub fn scratch_file(&self, extension: &str) -> Result<TempArtifact> {
        std::fs::create_dir_all(&self.root)?;
        let suffix = format!(".{}", extension.trim_start_matches('.'));
        let file = tempfile::Builder::new()
            .prefix("folio-")
            .suffix(&suffix)
            .tempfile_in(&self.root)?;
        debug!(path = %file.path().display(), "Scratch file created");
        Ok(TempArtifact {
            scratch: Scratch::File(file),
        })
    }

    /// Create a scoped temp directory.
    pub fn scratch_dir(&self) -> Result<TempArtifact> {
        std::fs::create_dir_all(&self.root)?;
        let dir = tempfile::Builder::new()
            .prefix("folio-")
            .tempdir_in(&self.root)?;
        debug!(path = %dir.path().display(), "Scratch directory created");
        Ok(TempArtifact {
            scratch: Scratch::Dir(dir),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_moves_staged_file_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");

        let artifact = StagedOutput::commit(&dest, b"%PDF-1.7 test").unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.7 test");
        assert_eq!(artifact.size, 13);
        assert_eq!(artifact.sha256, fingerprint(b"%PDF-1.7 test"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn dropped_stage_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.pdf");
        {
            let mut staged = StagedOutput::new(&dest).unwrap();
            staged.write_all(b"partial").unwrap();
        }
        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn stage_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested/deeper/out.pdf");
        StagedOutput::commit(&dest, b"x").unwrap();
        assert!(dest.exists());
    }

    #[test]
    fn scratch_artifacts_are_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let mut file = store.scratch_file("pdf").unwrap();
        file.write(b"overlay").unwrap();
        let file_path = file.path().to_path_buf();
        assert!(file_path.exists());
        assert_eq!(file_path.extension().unwrap(), "pdf");

        let scratch = store.scratch_dir().unwrap();
        let dir_path = scratch.path().to_path_buf();
        std::fs::write(dir_path.join("inner.txt"), "x").unwrap();

        drop(file);
        drop(scratch);
        assert!(!file_path.exists());
        assert!(!dir_path.exists());
    }

    #[test]
    fn allocated_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("store"));
        let a = store.allocate("pdf").unwrap();
        let b = store.allocate(".pdf").unwrap();
        assert_ne!(a, b);
        assert_eq!(b.extension().unwrap(), "pdf");
        assert!(store.root().is_dir());
    }
}
