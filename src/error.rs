// Sensorsynth - Synthetic IoT telemetry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for sensorsynth
//!
//! Generation itself only fails on bad arguments. Everything else is
//! export/import plumbing.

use thiserror::Error;

/// Result type alias for sensorsynth operations
pub type Result<T> = std::result::Result<T, SynthError>;

/// Main error type for sensorsynth operations
#[derive(Error, Debug)]
pub enum SynthError {
    /// A generator input or configuration value is out of its domain
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// Output path unwritable, input path unreadable, ...
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV record could not be turned back into a reading
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl SynthError {
    /// Shorthand for an [`SynthError::InvalidArgument`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SynthError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Whether this error is a precondition violation rather than an I/O failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SynthError::InvalidArgument { .. })
    }
}
