// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for testbridge-report

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or parsing a results artifact
#[derive(Debug, Error)]
pub enum ReportError {
    /// The results artifact is absent or unreadable
    #[error("Failed to read results artifact {}: {source}", path.display())]
    ArtifactRead {
        /// Resolved path of the artifact
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The results artifact exists but is not the expected document shape
    #[error("Malformed results artifact {}: {source}", path.display())]
    ArtifactFormat {
        /// Resolved path of the artifact
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// An in-memory results document did not parse
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ReportError {
    /// Whether the error came from reading the artifact (missing, permissions, ...)
    #[must_use]
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::ArtifactRead { .. })
    }

    /// Whether the error came from the document content rather than I/O
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::ArtifactFormat { .. } | Self::JsonParse(_))
    }
}
