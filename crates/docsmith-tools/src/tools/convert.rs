//! PDF conversion tool

use std::path::Path;

use docsmith_pdf::{ConversionOutcome, Converter};

use crate::config::ConversionSettings;
use crate::util::{ensure_docx_extension, ensure_pdf_extension};

/// Convert a document to PDF with the default converter chain.
///
/// Without `output_filename` the PDF is written beside the source with the
/// same stem.
pub async fn convert_to_pdf(filename: &str, output_filename: Option<&str>) -> String {
    let converter = ConversionSettings::default().converter();
    convert_to_pdf_with(&converter, filename, output_filename).await
}

/// Convert a document to PDF with an explicit converter chain
pub async fn convert_to_pdf_with(
    converter: &Converter,
    filename: &str,
    output_filename: Option<&str>,
) -> String {
    convert_outcome_with(converter, filename, output_filename)
        .await
        .message
}

/// Like [`convert_to_pdf_with`], keeping the structured outcome
pub async fn convert_outcome_with(
    converter: &Converter,
    filename: &str,
    output_filename: Option<&str>,
) -> ConversionOutcome {
    let filename = ensure_docx_extension(filename);
    let source = Path::new(&filename);
    if !source.exists() {
        return ConversionOutcome::failed(format!("Document {} does not exist", filename));
    }

    let target = match output_filename {
        Some(name) => ensure_pdf_extension(name).into(),
        None => source.with_extension("pdf"),
    };

    converter.convert(source, &target).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_source() {
        let message = convert_to_pdf("/nonexistent/report", None).await;
        assert_eq!(message, "Document /nonexistent/report.docx does not exist");
    }

    #[tokio::test]
    async fn test_no_backends_reports_failure() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.docx");
        std::fs::write(&source, b"docx").unwrap();

        let converter = Converter::new(Duration::from_secs(1));
        let message = convert_to_pdf_with(&converter, source.to_str().unwrap(), None).await;
        assert!(message.starts_with("Failed to convert document to PDF"));
        assert!(!docsmith_pdf::reports_success(&message));
    }
}
