//! Error types shared across Framewatch crates.

use std::path::PathBuf;

/// Top-level error type for Framewatch operations.
#[derive(Debug, thiserror::Error)]
pub enum FramewatchError {
    /// The video source could not be opened or a frame read failed.
    /// Always fatal: the pipeline never continues past a source fault.
    #[error("Source error: {message}")]
    Source { message: String },

    /// A collaborator backend (face/emotion or pose) failed on one frame.
    /// Recovered locally by the pipeline, which degrades to "no detection".
    #[error("Analyzer error: {message}")]
    Analyzer { message: String },

    /// The aggregate report could not be written.
    #[error("Report error: {message}")]
    Report { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FramewatchError.
pub type FramewatchResult<T> = Result<T, FramewatchError>;

impl FramewatchError {
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn analyzer(msg: impl Into<String>) -> Self {
        Self::Analyzer {
            message: msg.into(),
        }
    }

    pub fn report(msg: impl Into<String>) -> Self {
        Self::Report {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
