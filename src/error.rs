//! Error types for dataset loading.

use std::path::PathBuf;
use thiserror::Error;

/// Name of the dataset as shown in user-facing load errors.
pub const DATASET_LABEL: &str = "monsters.json";

#[derive(Debug, Error)]
pub enum LoadError {
    /// The server answered with a non-success status.
    #[error("failed to download {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset must be a JSON array of records")]
    NotAnArray,
}

impl LoadError {
    /// Message shown inline in place of a detail page. Status codes are
    /// interpolated verbatim.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Status { status, .. } => {
                format!("Error loading {DATASET_LABEL} ({status})")
            }
            other => format!("Error loading {DATASET_LABEL} ({other})"),
        }
    }
}
