use std::path::{Path, PathBuf};

use thiserror::Error;

/// Verdict returned by a comparison service, passed through unmodified.
pub type ComparisonResult = serde_json::Value;

#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("{url} returned invalid JSON: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Compares the faces in two image files.
pub trait FaceComparer: Send {
    fn compare(&self, first: &Path, second: &Path) -> Result<ComparisonResult, ComparisonError>;
}
