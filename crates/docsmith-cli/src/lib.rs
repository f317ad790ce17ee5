//! docsmith CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docsmith, including:
//! - Create / Paragraph / Heading: build documents with literal formatting
//! - Convert: turn a document into PDF through an installed converter
//! - Inspect / Info: read formatting and metadata back
//! - DemoFormatting / VerifyPdf: scripted end-to-end checks
//!
//! # Binary Usage
//!
//! ```bash
//! docsmith create cv.docx --title "CV" --author "Me"
//! docsmith paragraph cv.docx "JAMES MEHORTER" --font Helvetica --size 36 --bold
//! docsmith heading cv.docx "SKILLS" --level 2 --border-bottom
//! docsmith inspect cv.docx --format json
//! docsmith verify-pdf --dir "work dir"
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    convert_command, create_command, demo_formatting_command, info_command, inspect_command,
    verify_pdf_command,
};
pub use app::{run_cli, OutputFormat};
