//! Error types for the meds_core library.
//!
//! Only the I/O collaborators (loader, config, exports) fail. The
//! resolver, travel inference and interaction aggregator are total.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for meds_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML record or glossary file could not be parsed
    #[error("YAML error in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Directory traversal error
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Two source files declared the same drug id
    #[error("Duplicate drug id: {0}")]
    DuplicateDrugId(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
