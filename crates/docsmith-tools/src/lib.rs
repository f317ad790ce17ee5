//! docsmith-tools - document tool functions
//!
//! Each tool takes file names and literal formatting parameters and answers
//! with a human-readable status message, the way a document tool server
//! would. Errors never escape a tool: they become part of the message.
//!
//! # Example
//!
//! ```no_run
//! use docsmith_tools::{add_heading, create_document, HeadingOptions};
//!
//! # async fn demo() {
//! println!("{}", create_document("report.docx", Some("Report"), None).await);
//! let heading = HeadingOptions { level: 2, border_bottom: true, ..Default::default() };
//! println!("{}", add_heading("report.docx", "SKILLS", &heading).await);
//! # }
//! ```

pub mod config;
pub mod flows;
pub mod tools;
pub mod util;

pub use config::{ConfigError, ConversionSettings, DemoSettings, Settings};
pub use tools::content::{
    add_heading, add_paragraph, describe_formatting, paragraph_formatting, HeadingOptions,
    ParagraphOptions, ParagraphReport,
};
pub use flows::{check_conversion, run_formatting_demo, ConversionCheck, FormattingDemo};
pub use tools::convert::{convert_outcome_with, convert_to_pdf, convert_to_pdf_with};
pub use tools::document::{create_document, document_info, get_document_info, DocumentInfo};
