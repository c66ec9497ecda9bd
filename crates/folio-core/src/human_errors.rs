// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for front ends.
//
// Every engine error is mapped to plain English with a suggestion and a blame
// class, so a CLI or an HTTP layer can pick an exit code or status without
// matching on engine internals.

use crate::error::FolioError;

/// Who has to act to resolve an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blame {
    /// The input document or the operation parameters are at fault.
    Input,
    /// A password was missing or wrong.
    Credentials,
    /// The host is at fault: disk, permissions, missing converter.
    Environment,
    /// The engine itself failed.
    Internal,
}

impl Blame {
    /// Conventional process exit code for this class.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Input => 2,
            Self::Credentials => 3,
            Self::Environment => 4,
            Self::Internal => 1,
        }
    }

    /// Closest HTTP status code, for callers that speak HTTP.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Input => 400,
            Self::Credentials => 401,
            Self::Environment => 503,
            Self::Internal => 500,
        }
    }
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub blame: Blame,
}

/// Convert a `FolioError` into a `HumanError`.
pub fn humanize_error(err: &FolioError) -> HumanError {
    match err {
        // -- Input documents --
        FolioError::UnreadableDocument { path, .. } => HumanError {
            message: format!("{} could not be read as a PDF.", file_name(path)),
            suggestion: "The file may be damaged or not a PDF at all. Try the repair operation, or re-export it from the program that made it.".into(),
            blame: Blame::Input,
        },

        FolioError::InputTooLarge { path, limit, .. } => HumanError {
            message: format!("{} is too large.", file_name(path)),
            suggestion: format!(
                "Files up to {} MB are accepted. Compress or split it first.",
                limit / (1024 * 1024)
            ),
            blame: Blame::Input,
        },

        FolioError::UnsupportedFormat(detail) => HumanError {
            message: "This type of file can't be converted to PDF.".into(),
            suggestion: format!(
                "Images, plain text and office documents are supported. (File type: {detail})"
            ),
            blame: Blame::Input,
        },

        // -- Parameters --
        FolioError::InvalidRange(detail) => HumanError {
            message: "That page range doesn't look right.".into(),
            suggestion: format!(
                "Write ranges as start-end, for example 1-5 or 1-5,6-10. (Got: {detail})"
            ),
            blame: Blame::Input,
        },

        FolioError::InvalidParameters(detail) => HumanError {
            message: "Some of the options don't fit together.".into(),
            suggestion: format!("Check the options and try again. ({detail})"),
            blame: Blame::Input,
        },

        // -- Security --
        FolioError::WrongPassword => HumanError {
            message: "The password is incorrect.".into(),
            suggestion: "Check the password (it is case-sensitive) and try again.".into(),
            blame: Blame::Credentials,
        },

        FolioError::EncryptionFailed(_) => HumanError {
            message: "The document couldn't be password-protected.".into(),
            suggestion: "The file may use features that can't be encrypted. Try running repair on it first.".into(),
            blame: Blame::Internal,
        },

        FolioError::DecryptionFailed(_) => HumanError {
            message: "The document couldn't be unlocked.".into(),
            suggestion: "The file may use an encryption scheme that isn't supported.".into(),
            blame: Blame::Input,
        },

        // -- Synthesis and external tools --
        FolioError::RenderFailed(_) => HumanError {
            message: "The output document couldn't be generated.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            blame: Blame::Internal,
        },

        FolioError::ExternalToolUnavailable(detail) => HumanError {
            message: "The office document converter isn't available.".into(),
            suggestion: format!(
                "Install LibreOffice, or point the office.program setting at it. ({detail})"
            ),
            blame: Blame::Environment,
        },

        // -- Storage --
        FolioError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                blame: Blame::Input,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Folio doesn't have permission to use that file or folder.".into(),
                suggestion: "Check the permissions on the input file and the output folder.".into(),
                blame: Blame::Environment,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                blame: Blame::Environment,
            },
        },

        FolioError::Serialization(_) => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: "Check that it is valid JSON with the expected keys.".into(),
            blame: Blame::Input,
        },
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
