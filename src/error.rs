//! Error types shared by the catalog loader, the provider and the lifecycle

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the web search provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The engine catalog could not be read
    #[error("failed to read engine catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The engine catalog is not a JSON array of engine objects
    #[error("malformed engine catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The search was superseded or cancelled by the host
    #[error("Operation Cancelled")]
    OperationCancelled,

    /// The stored engine index does not point into the catalog
    #[error("engine index {index} is out of range for a catalog of {len} engines")]
    IndexOutOfRange { index: i64, len: usize },

    /// A search method was called while the extension is disabled
    #[error("provider is not enabled")]
    NotEnabled,

    /// The settings store failed to read or persist a value
    #[error("settings store error: {0}")]
    Settings(String),

    /// The URL launcher failed to start
    #[error("failed to open {url}: {source}")]
    Launch {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProviderError {
    /// Whether this error only signals a cancelled search
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProviderError::OperationCancelled)
    }
}

/// Result alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;
