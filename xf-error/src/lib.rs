//! Unified error handling for xrfacts
//!
//! One error type shared by the parser, the persistence layer, the
//! hardware probes and the settings loader.

use std::io;
use std::path::PathBuf;

/// Result type alias using XrFactsError
pub type Result<T> = std::result::Result<T, XrFactsError>;

/// Unified error type for all xrfacts operations
#[derive(thiserror::Error, Debug)]
pub enum XrFactsError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Invalid path {path}: {reason}")]
    InvalidPath {
        path: PathBuf,
        reason: String,
    },

    // ============================================================================
    // External Command Errors
    // ============================================================================
    #[error("Failed to run {program}: {source}")]
    CommandSpawn {
        program: String,
        source: io::Error,
    },

    #[error("{program} exited unsuccessfully: {stderr}")]
    CommandFailed {
        program: String,
        stderr: String,
    },

    #[error("Display mode enumeration unavailable: {0}")]
    EnumerationUnavailable(String),

    // ============================================================================
    // Parse Errors
    // ============================================================================
    #[error("Mode block at line {line} skipped: {reason}")]
    ModeParse {
        line: usize,
        reason: String,
    },

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Invalid EDID data: {0}")]
    InvalidEdid(String),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    // ============================================================================
    // Enrichment Errors
    // ============================================================================
    #[error("GPU query failed: {0}")]
    GpuQuery(String),
}

impl XrFactsError {
    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a mode parse error for the block starting at `line`
    pub fn mode_parse(line: usize, reason: impl Into<String>) -> Self {
        Self::ModeParse {
            line,
            reason: reason.into(),
        }
    }

    /// True for errors that must abort a fact-gathering run.
    ///
    /// Only EDID persistence failures are fatal; everything else degrades
    /// to an empty or defaulted field in the report.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::FileWrite { .. } | Self::InvalidPath { .. } | Self::InvalidEdid(_)
        )
    }
}
