// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all engine operations.
///
/// Every library failure is mapped to one of these kinds at the operation
/// boundary; nothing opaque escapes the engine.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Input documents --
    #[error("cannot read document {}: {reason}", path.display())]
    UnreadableDocument { path: PathBuf, reason: String },

    #[error("input {} is {size} bytes, above the {limit} byte limit", path.display())]
    InputTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),

    // -- Parameters --
    #[error("invalid page range: {0}")]
    InvalidRange(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    // -- Security --
    #[error("incorrect password")]
    WrongPassword,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    // -- Synthesis and external tools --
    #[error("failed to render output: {0}")]
    RenderFailed(String),

    #[error("external converter unavailable: {0}")]
    ExternalToolUnavailable(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FolioError {
    /// Shorthand for [`FolioError::UnreadableDocument`].
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::UnreadableDocument {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors caused by the caller's parameters, detected before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange(_) | Self::InvalidParameters(_) | Self::UnsupportedFormat(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_message_names_the_path() {
        let err = FolioError::unreadable("/tmp/in.pdf", "no trailer");
        assert_eq!(err.to_string(), "cannot read document /tmp/in.pdf: no trailer");
    }

    #[test]
    fn validation_kinds() {
        assert!(FolioError::InvalidRange("x".into()).is_validation());
        assert!(FolioError::UnsupportedFormat("exe".into()).is_validation());
        assert!(!FolioError::WrongPassword.is_validation());
    }
}
