//! Typed error definitions for medianame.
//! Covers configuration, lookup and relocation failures so the orchestrator
//! can classify each one without string matching.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaNameError {
    #[error("{0}")]
    ConfigValidation(String),

    #[error("No configuration file found")]
    ConfigNotFound,

    #[error("Could not parse configuration file {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Metadata provider unavailable: {0}")]
    LookupUnavailable(String),

    #[error("No matches found for {0}")]
    LookupNotFound(String),

    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("Failed to move {source_path} -> {destination}: {reason}")]
    RelocationFailed {
        source_path: PathBuf,
        destination: PathBuf,
        reason: String,
    },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl MediaNameError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            MediaNameError::ConfigValidation(_) => 10,
            MediaNameError::ConfigNotFound => 11,
            MediaNameError::ConfigParse { .. } => 12,
            MediaNameError::LookupUnavailable(_) => 20,
            MediaNameError::LookupNotFound(_) => 21,
            MediaNameError::DestinationExists(_) => 30,
            MediaNameError::RelocationFailed { .. } => 31,
            MediaNameError::Interrupted => 130,
        }
    }

    /// Short machine-friendly name used as the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            MediaNameError::ConfigValidation(_) => "config_validation",
            MediaNameError::ConfigNotFound => "config_not_found",
            MediaNameError::ConfigParse { .. } => "config_parse",
            MediaNameError::LookupUnavailable(_) => "lookup_unavailable",
            MediaNameError::LookupNotFound(_) => "lookup_not_found",
            MediaNameError::DestinationExists(_) => "destination_exists",
            MediaNameError::RelocationFailed { .. } => "relocation_failed",
            MediaNameError::Interrupted => "interrupted",
        }
    }

    /// True for lookup failures, which the orchestrator records as not-found.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            MediaNameError::LookupUnavailable(_) | MediaNameError::LookupNotFound(_)
        )
    }
}

pub type Result<T, E = MediaNameError> = std::result::Result<T, E>;
