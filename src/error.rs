// src/error.rs
//! Error types shared across the repodeps library

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the metadata engine and transports
#[derive(Error, Debug)]
pub enum Error {
    /// Failure while constructing a component (HTTP client, store, ...)
    #[error("Initialization error: {0}")]
    InitError(String),

    /// Malformed index document or undecodable payload
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Network/transport failure for one URL
    #[error("Download error: {0}")]
    DownloadError(String),

    /// Local filesystem failure
    #[error("I/O error: {0}")]
    IoError(String),

    /// Compression family could not be identified
    #[error("Unsupported compression format: {0}")]
    UnsupportedFormat(String),

    /// Configuration value rejected at the boundary
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}
