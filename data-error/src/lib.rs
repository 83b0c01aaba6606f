use std::{fmt, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlitError>;

/// The part of a generated buffer that was being written when a write
/// failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    /// Mode switch and the opening of the ingestion call
    Preamble,
    /// Quoted id and MIME of a record, up to the data URI prefix
    Header,
    /// Base64 payload streamed from the source file
    Payload,
    /// Closing quote of a record
    Trailer,
    /// Closing of the ingestion call and the final flush
    Flush,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            WriteStage::Preamble => "preamble",
            WriteStage::Header => "record header",
            WriteStage::Payload => "record payload",
            WriteStage::Trailer => "record trailer",
            WriteStage::Flush => "flush",
        };
        f.write_str(stage)
    }
}

#[derive(Error, Debug)]
pub enum BlitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Asset id collision: {id:?} is produced by both {} and {}",
        .first.display(),
        .second.display()
    )]
    Collision {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {stage}{}: {source}", describe_path(.path))]
    Write {
        stage: WriteStage,
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing error: {0}")]
    Parse(String),
}

fn describe_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" of {}", path.display()),
        None => String::new(),
    }
}

impl BlitError {
    /// Build a write failure for the given stage and source file
    pub fn write(
        stage: WriteStage,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        BlitError::Write {
            stage,
            path,
            source,
        }
    }
}

impl From<serde_json::Error> for BlitError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
