use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("image at {path} could not be loaded: {message}")]
    Load { path: PathBuf, message: String },
    #[error("detection failed: {0}")]
    Detection(String),
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write region to {path}: {message}")]
    Write { path: PathBuf, message: String },
}
