// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default upper bound on input file size (100 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 100 * 1024 * 1024;

/// Settings handed to the engine at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root for generated artifacts and scoped intermediates.
    pub temp_dir: PathBuf,
    /// Reject inputs larger than this many bytes. `None` disables the check.
    pub max_input_bytes: Option<u64>,
    /// Office conversion settings.
    pub office: OfficeConfig,
    /// Layout used when paginating plain text.
    pub text_layout: TextLayout,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().join("folio"),
            max_input_bytes: Some(DEFAULT_MAX_INPUT_BYTES),
            office: OfficeConfig::default(),
            text_layout: TextLayout::default(),
        }
    }
}

impl EngineConfig {
    /// Default configuration rooted at a specific scratch directory.
    pub fn with_temp_dir(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            ..Self::default()
        }
    }

    /// Load a JSON configuration file. Missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), raw)?;
        Ok(())
    }

    /// Create the temp directory if it does not exist yet.
    pub fn ensure_temp_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.temp_dir)?;
        Ok(&self.temp_dir)
    }
}

/// External office-document converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfficeConfig {
    /// Converter executable, invoked as
    /// `<program> --headless --convert-to pdf --outdir <dir> <input>`.
    pub program: String,
    /// Emit a placeholder page when the converter is unavailable or fails.
    pub placeholder_fallback: bool,
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self {
            program: "soffice".to_string(),
            placeholder_fallback: true,
        }
    }
}

/// Text pagination parameters, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLayout {
    pub font_size: f32,
    pub line_height: f32,
    pub margin: f32,
    /// Vertical gap inserted for a blank input line.
    pub spacer_height: f32,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            line_height: 14.0,
            margin: 72.0,
            spacer_height: 12.0,
        }
    }
}
