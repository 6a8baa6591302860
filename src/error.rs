//! Error type for everything outside the rule engine: lookup files, batch
//! input and collaborator calls. The rules themselves never fail; they just
//! find no date.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed lookup tables: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot walk input directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{source_name} lookup failed: {message}")]
    Collaborator { source_name: String, message: String },
}

impl CleanError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn collaborator(source_name: &str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }
}
