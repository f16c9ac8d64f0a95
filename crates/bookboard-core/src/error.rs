//! Error types for bookboard-core
//!
//! The analytics engine itself only fails on an unrecognized range token.
//! Everything else here belongs to the edges: config and snapshot loading.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for bookboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Range Errors
    // ===================
    #[error("Invalid range token '{token}' (expected one of: 7d, 30d, 90d, 12m)")]
    InvalidRange { token: String },

    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse snapshot JSON in {path}: {message}")]
    SnapshotParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse config TOML in {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        message: String,
        #[source]
        source: toml::de::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl CoreError {
    /// Actionable hint for the user, if one applies
    pub fn suggestion(&self) -> Option<String> {
        match self {
            CoreError::InvalidRange { .. } => {
                Some("Use one of 7d, 30d, 90d or 12m (default: 30d)".to_string())
            }
            CoreError::FileRead { path, .. } => {
                Some(format!("Check the file exists: ls {}", path.display()))
            }
            CoreError::SnapshotParse { .. } => {
                Some("Validate JSON syntax with: jq . <file>".to_string())
            }
            CoreError::ConfigParse { .. } | CoreError::InvalidConfig { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
