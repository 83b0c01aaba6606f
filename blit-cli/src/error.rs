use std::{io, path::PathBuf};

use data_error::BlitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not load config {}: {message}", .path.display())]
    ConfigLoad { path: PathBuf, message: String },

    #[error("Failed to render output: {0}")]
    OutputError(String),

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    BlitError(#[from] BlitError),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::OutputError(e.to_string())
    }
}
