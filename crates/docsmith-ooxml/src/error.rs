//! Error types for OOXML operations

use thiserror::Error;

/// Errors that can occur during OOXML operations
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Error reading or writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Required part not found in the package
    #[error("Required file not found: {0}")]
    MissingFile(String),

    /// Invalid document structure
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// A formatting value outside what OOXML can express
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Heading level outside 1..=9
    #[error("Invalid heading level: {0}. Level must be between 1 and 9")]
    InvalidHeadingLevel(u8),
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
