//! # docsmith-ooxml
//!
//! OOXML (Office Open XML) word-processing packages for docsmith.
//!
//! This crate provides functionality to:
//! - Create DOCX packages with a built-in style sheet and core properties
//! - Append paragraphs and headings with direct run formatting
//! - Read paragraphs back with the formatting they carry
//!
//! ## Example: Reading a Document
//!
//! ```no_run
//! use docsmith_ooxml::DocxPackage;
//!
//! let package = DocxPackage::open("document.docx")?;
//! for para in package.paragraphs()? {
//!     println!("{:?}: {}", para.style_id, para.text());
//! }
//! # Ok::<(), docsmith_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod document;
pub mod error;
pub mod format;
pub mod package;
pub mod properties;
pub mod relationships;
pub mod styles;
mod xml;

pub use archive::OoxmlArchive;
pub use document::{Document, Paragraph, Run};
pub use error::{OoxmlError, Result};
pub use format::{Color, ParagraphFormat, RunFormat};
pub use package::DocxPackage;
pub use properties::CoreProperties;
pub use relationships::Relationships;
pub use styles::{Style, StyleSheet, StyleType};
pub use xml::escape_xml;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
