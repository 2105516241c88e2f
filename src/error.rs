//! Error types for unplate library.

use std::io;
use thiserror::Error;

/// Result type alias for unplate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while cleaning a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document dump could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured pattern is not a valid regular expression.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Engine options are out of their valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// A collaborator (fragment, table or field source) failed.
    #[error("Source error: {0}")]
    Source(String),

    /// Error during rendering (text, Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
