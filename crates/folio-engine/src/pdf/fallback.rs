// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered backend fallback for protect and unlock.

use tracing::{error, info, warn};

use folio_core::error::{FolioError, Result};

use super::backend::DocumentBackend;

/// Run `attempt` against each backend in order until one succeeds.
///
/// A `WrongPassword` result is returned immediately: another backend cannot
/// make a wrong password right. Any other failure is logged and the next
/// backend is tried. When every backend fails, `exhausted` turns the last
/// cause into the operation's typed error.
pub fn run_chain<T>(
    backends: &[&dyn DocumentBackend],
    exhausted: impl FnOnce(String) -> FolioError,
    mut attempt: impl FnMut(&dyn DocumentBackend) -> Result<T>,
) -> Result<T> {
    let mut last_cause = String::from("no backend available");

    for (position, backend) in backends.iter().enumerate() {
        match attempt(*backend) {
            Ok(value) => {
                if position > 0 {
                    info!(backend = %backend.kind(), "Fallback backend succeeded");
                }
                return Ok(value);
            }
            Err(FolioError::WrongPassword) => {
                warn!(backend = %backend.kind(), "Password rejected, not retrying");
                return Err(FolioError::WrongPassword);
            }
            Err(err) => {
                warn!(
                    backend = %backend.kind(),
                    error = %err,
                    "Backend failed, falling back"
                );
                last_cause = format!("{} backend: {}", backend.kind(), err);
            }
        }
    }

    error!(cause = %last_cause, "All backends failed");
    Err(exhausted(last_cause))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;

    use folio_core::{Credentials, PermissionSet};

    use super::*;
    use crate::pdf::backend::BackendKind;
    use crate::pdf::document::LoadedDocument;

    /// A backend that is only ever asked for its kind.
    struct Named(BackendKind);

    impl DocumentBackend for Named {
        fn kind(&self) -> BackendKind {
            self.0
        }
        fn open(&self, path: &Path) -> Result<LoadedDocument> {
            Err(FolioError::unreadable(path, "test backend"))
        }
        fn serialize(&self, _doc: &mut LoadedDocument) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
        fn decrypt(&self, _doc: &mut LoadedDocument, _password: &str) -> Result<()> {
            Ok(())
        }
        fn encrypt(
            &self,
            _doc: &mut LoadedDocument,
            _credentials: &Credentials,
            _permissions: &PermissionSet,
        ) -> Result<()> {
            Ok(())
        }
    }

    const STRUCTURAL: Named = Named(BackendKind::Structural);
    const CONTENT: Named = Named(BackendKind::ContentStream);

    #[test]
    fn first_success_wins() {
        let tried = RefCell::new(Vec::new());
        let result = run_chain(&[&STRUCTURAL, &CONTENT], FolioError::EncryptionFailed, |b| {
            tried.borrow_mut().push(b.kind());
            Ok(b.kind())
        });
        assert_eq!(result.unwrap(), BackendKind::Structural);
        assert_eq!(*tried.borrow(), vec![BackendKind::Structural]);
    }

    #[test]
    fn falls_back_after_a_generic_failure() {
        let result = run_chain(&[&STRUCTURAL, &CONTENT], FolioError::EncryptionFailed, |b| {
            match b.kind() {
                BackendKind::Structural => Err(FolioError::EncryptionFailed("rc4".into())),
                BackendKind::ContentStream => Ok("aes"),
            }
        });
        assert_eq!(result.unwrap(), "aes");
    }

    #[test]
    fn wrong_password_is_never_retried() {
        let mut attempts = 0;
        let result: Result<()> = run_chain(&[&STRUCTURAL, &CONTENT], FolioError::DecryptionFailed, |_| {
            attempts += 1;
            Err(FolioError::WrongPassword)
        });
        assert!(matches!(result, Err(FolioError::WrongPassword)));
        assert_eq!(attempts, 1);
    }

    #[test]
    fn exhaustion_carries_the_last_cause() {
        let result: Result<()> = run_chain(&[&STRUCTURAL, &CONTENT], FolioError::DecryptionFailed, |b| {
            Err(FolioError::DecryptionFailed(format!("{} broke", b.kind())))
        });
        match result {
            Err(FolioError::DecryptionFailed(cause)) => {
                assert!(cause.contains("content-stream"), "{cause}");
            }
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }
}
