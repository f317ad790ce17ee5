//! Error types for PDF conversion

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors that can occur during PDF conversion
#[derive(Error, Debug)]
pub enum PdfError {
    /// Source document missing
    #[error("Source document not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Converter executable not installed
    #[error("{0} is not installed or not on PATH")]
    ToolNotFound(String),

    /// Converter ran and reported failure
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// Converter did not finish in time
    #[error("{tool} timed out after {}s", .after.as_secs())]
    Timeout { tool: String, after: Duration },

    /// Converter exited cleanly but wrote nothing where expected
    #[error("{tool} produced no PDF at {}", .expected.display())]
    MissingOutput { tool: String, expected: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfError {
    /// Whether the error means the tool is absent rather than broken
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PdfError::ToolNotFound(_))
    }
}
