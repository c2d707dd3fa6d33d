//! Error type definitions for the EPG merge pipeline

use thiserror::Error;

/// Top-level application error type
///
/// Errors that abort the run as a whole. Per-source failures are
/// represented by [`SourceError`] and never propagate past the pipeline
/// loop; they only surface here when the caller chooses to.
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-source failure taxonomy
///
/// Any of these failing for one source skips that source only; the
/// pipeline continues with whatever remains.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network fetch timed out
    #[error("Connection timeout: {url}")]
    Timeout { url: String },

    /// Non-success HTTP status from an external source
    #[error("HTTP error: {status} {message} - URL: {url}")]
    Http {
        status: u16,
        message: String,
        url: String,
    },

    /// Network-level failures (DNS, connect, mid-body errors)
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// Local file source could not be read
    #[error("Failed to read local source {path}: {message}")]
    LocalRead { path: String, message: String },

    /// Gzip payload could not be decompressed
    #[error("Failed to decompress '{source_name}': {message}")]
    Decompress {
        source_name: String,
        message: String,
    },

    /// Both the strict parse and the repaired reparse failed
    #[error("Parse error in '{source_name}': {message}")]
    Parse {
        source_name: String,
        message: String,
    },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Create a parse error
    pub fn parse<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a decompression error
    pub fn decompress<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        Self::Decompress {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}
