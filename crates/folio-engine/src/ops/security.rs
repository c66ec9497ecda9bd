// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Password protection: protect and unlock, each running the structural
// backend first and the content-stream backend as fallback.

use std::path::Path;

use tracing::{info, instrument};

use folio_core::ProtectOptions;
use folio_core::error::{FolioError, Result};

use crate::artifact::{Artifact, StagedOutput};
use crate::engine::PdfEngine;
use crate::pdf::fallback::run_chain;
use crate::pdf::{ContentStreamBackend, DocumentBackend, StructuralBackend};

impl PdfEngine {
    /// Encrypt the document. The owner password defaults to the user
    /// password; at least one of them is required.
    #[instrument(skip_all, fields(input = %input.as_ref().display()))]
    pub fn protect(
        &self,
        input: impl AsRef<Path>,
        options: &ProtectOptions,
        output: impl AsRef<Path>,
    ) -> Result<Artifact> {
        let content_stream = ContentStreamBackend::default();
        let backends: [&dyn DocumentBackend; 2] = [&StructuralBackend, &content_stream];
        self.protect_with(&backends, input.as_ref(), options, output.as_ref())
    }

    pub(crate) fn protect_with(
        &self,
        backends: &[&dyn DocumentBackend],
        input: &Path,
        options: &ProtectOptions,
        output: &Path,
    ) -> Result<Artifact> {
        let credentials = options.credentials()?;
        let source = self.open_plain(input)?;

        let bytes = run_chain(backends, FolioError::EncryptionFailed, |backend| {
            let mut doc = source.clone();
            backend.encrypt(&mut doc, &credentials, &options.permissions)?;
            backend.serialize(&mut doc)
        })?;

        let artifact = StagedOutput::commit(output, &bytes)?;
        info!(pages = source.page_count(), "Document protected");
        Ok(artifact)
    }

    /// Remove encryption with `password`. A document that is not encrypted
    /// is copied through byte for byte.
    #[instrument(skip_all, fields(input = %input.as_ref().display()))]
    pub fn unlock(
        &self,
        input: impl AsRef<Path>,
        password: &str,
        output: impl AsRef<Path>,
    ) -> Result<Artifact> {
        let content_stream = ContentStreamBackend::default();
        let backends: [&dyn DocumentBackend; 2] = [&StructuralBackend, &content_stream];
        self.unlock_with(&backends, input.as_ref(), password, output.as_ref())
    }

    pub(crate) fn unlock_with(
        &self,
        backends: &[&dyn DocumentBackend],
        input: &Path,
        password: &str,
        output: &Path,
    ) -> Result<Artifact> {
        self.check_input(input)?;

        let source = StructuralBackend.open(input)?;
        if !source.was_encrypted() {
            info!("Document is not encrypted, copying unchanged");
            let bytes = std::fs::read(input)?;
            return StagedOutput::commit(output, &bytes);
        }

        let mut pages = 0;
        let bytes = run_chain(backends, FolioError::DecryptionFailed, |backend| {
            let mut doc = source.clone();
            backend.decrypt(&mut doc, password)?;
            pages = doc.page_count();
            backend.serialize(&mut doc)
        })?;

        let artifact = StagedOutput::commit(output, &bytes)?;
        info!(pages, "Document unlocked");
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use lopdf::{Document, dictionary};
    use tempfile::TempDir;

    use folio_core::{Credentials, EngineConfig, PageBox, PermissionSet};

    use super::*;
    use crate::pdf::font::helvetica_dict;
    use crate::pdf::{BackendKind, LoadedDocument, PageAssembler};

    /// Stands in for a structural backend that cannot handle the document.
    struct Unsupported;

    impl DocumentBackend for Unsupported {
        fn kind(&self) -> BackendKind {
            BackendKind::Structural
        }
        fn open(&self, path: &Path) -> Result<LoadedDocument> {
            LoadedDocument::open(path)
        }
        fn serialize(&self, _doc: &mut LoadedDocument) -> Result<Vec<u8>> {
            Err(FolioError::RenderFailed("unsupported".into()))
        }
        fn decrypt(&self, _doc: &mut LoadedDocument, _password: &str) -> Result<()> {
            Err(FolioError::DecryptionFailed("unsupported security handler".into()))
        }
        fn encrypt(
            &self,
            _doc: &mut LoadedDocument,
            _credentials: &Credentials,
            _permissions: &PermissionSet,
        ) -> Result<()> {
            Err(FolioError::EncryptionFailed("unsupported permission encoding".into()))
        }
    }

    fn workspace() -> (TempDir, PdfEngine) {
        let dir = tempfile::tempdir().unwrap();
        let engine = PdfEngine::new(EngineConfig::with_temp_dir(dir.path().join("scratch")));
        (dir, engine)
    }

    fn labelled(dir: &TempDir, name: &str, pages: usize) -> PathBuf {
        let mut assembler = PageAssembler::new();
        let font = assembler.add_object(helvetica_dict());
        for n in 1..=pages {
            assembler.push_synthetic_page(
                &PageBox::from_size(612.0, 792.0),
                format!("BT /F1 12 Tf 72 720 Td (Page {n}) Tj ET").into_bytes(),
                dictionary! { "Font" => dictionary! { "F1" => font } },
            );
        }
        let path = dir.path().join(name);
        assembler.finish().save(&path).unwrap();
        path
    }

    fn labels(path: &Path) -> Vec<String> {
        let mut doc = Document::load(path).unwrap();
        doc.decompress();
        doc.get_pages()
            .into_values()
            .map(|id| {
                let content = String::from_utf8_lossy(&doc.get_page_content(id).unwrap()).into_owned();
                let start = content.find("(Page ").map(|i| i + 1).unwrap_or(0);
                let end = content[start..].find(')').map(|i| start + i).unwrap_or(start);
                content[start..end].to_string()
            })
            .collect()
    }

    fn options(user: &str, owner: &str) -> ProtectOptions {
        ProtectOptions {
            user_password: Some(user.to_string()),
            owner_password: Some(owner.to_string()),
            permissions: PermissionSet::default(),
        }
    }

    #[test]
    fn protect_falls_back_to_aes_when_the_first_backend_refuses() {
        let (dir, engine) = workspace();
        let input = labelled(&dir, "plain.pdf", 2);
        let locked = dir.path().join("locked.pdf");
        let unlocked = dir.path().join("unlocked.pdf");

        let content_stream = ContentStreamBackend::default();
        let backends: [&dyn DocumentBackend; 2] = [&Unsupported, &content_stream];
        engine
            .protect_with(&backends, &input, &options("u", "o"), &locked)
            .unwrap();

        let sealed = LoadedDocument::open(&locked).unwrap();
        assert!(sealed.is_locked());
        let filter = sealed
            .document()
            .get_encrypted()
            .and_then(|dict| dict.get(b"V").and_then(|v| v.as_i64()))
            .unwrap();
        assert_eq!(filter, 4);

        engine.unlock(&locked, "u", &unlocked).unwrap();
        assert_eq!(labels(&unlocked), vec!["Page 1", "Page 2"]);
    }

    #[test]
    fn unlock_falls_back_when_the_first_backend_refuses() {
        let (dir, engine) = workspace();
        let input = labelled(&dir, "plain.pdf", 3);
        let locked = dir.path().join("locked.pdf");
        let unlocked = dir.path().join("unlocked.pdf");
        engine.protect(&input, &options("u", "o"), &locked).unwrap();

        let content_stream = ContentStreamBackend::default();
        let backends: [&dyn DocumentBackend; 2] = [&Unsupported, &content_stream];
        engine.unlock_with(&backends, &locked, "o", &unlocked).unwrap();

        assert_eq!(labels(&unlocked), vec!["Page 1", "Page 2", "Page 3"]);
        assert!(!LoadedDocument::open(&unlocked).unwrap().is_encrypted());
    }

    #[test]
    fn wrong_password_is_not_retried_on_the_fallback() {
        let (dir, engine) = workspace();
        let input = labelled(&dir, "plain.pdf", 1);
        let locked = dir.path().join("locked.pdf");
        engine.protect(&input, &options("u", "o"), &locked).unwrap();

        let content_stream = ContentStreamBackend::default();
        let backends: [&dyn DocumentBackend; 2] = [&content_stream, &Unsupported];
        let err = engine
            .unlock_with(&backends, &locked, "nope", &dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, FolioError::WrongPassword));
    }

    #[test]
    fn every_backend_refusing_is_a_decryption_failure() {
        let (dir, engine) = workspace();
        let input = labelled(&dir, "plain.pdf", 1);
        let locked = dir.path().join("locked.pdf");
        let out = dir.path().join("out.pdf");
        engine.protect(&input, &options("u", "o"), &locked).unwrap();

        let backends: [&dyn DocumentBackend; 2] = [&Unsupported, &Unsupported];
        let err = engine.unlock_with(&backends, &locked, "u", &out).unwrap_err();
        assert!(matches!(err, FolioError::DecryptionFailed(_)));
        assert!(!out.exists());
    }
}
