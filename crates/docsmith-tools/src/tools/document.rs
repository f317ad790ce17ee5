//! Document creation and metadata tools

use std::path::Path;

use docsmith_ooxml::{DocxPackage, OoxmlError};
use serde::Serialize;
use tracing::info;

use crate::util::{check_file_writeable, ensure_docx_extension};

/// Create a new document, replacing any existing file of the same name
pub async fn create_document(filename: &str, title: Option<&str>, author: Option<&str>) -> String {
    let filename = ensure_docx_extension(filename);
    let path = Path::new(&filename);

    if let Err(reason) = check_file_writeable(path) {
        return format!("Cannot create document: {}", reason);
    }

    let package = DocxPackage::new(title, author);
    match package.save(path) {
        Ok(()) => {
            info!(document = %filename, "created document");
            format!("Document {} created successfully", filename)
        }
        Err(e) => format!("Failed to create document: {}", e),
    }
}

/// Summary of a document's metadata and content
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub paragraphs: usize,
    pub headings: usize,
    pub tables: usize,
    pub characters: usize,
}

/// Read a document's metadata and content counts
pub fn document_info(path: &Path) -> Result<DocumentInfo, OoxmlError> {
    let package = DocxPackage::open(path)?;
    let properties = package.core_properties()?;
    let document = package.document()?;

    let headings = document
        .paragraphs
        .iter()
        .filter(|p| {
            p.style_id
                .as_deref()
                .and_then(|id| package.styles().heading_level(id))
                .is_some()
        })
        .count();

    Ok(DocumentInfo {
        title: properties.title,
        author: properties.creator,
        paragraphs: document.paragraphs.len(),
        headings,
        tables: document.tables,
        characters: document.paragraphs.iter().map(|p| p.text().chars().count()).sum(),
    })
}

/// Human-readable document summary
pub async fn get_document_info(filename: &str) -> String {
    let filename = ensure_docx_extension(filename);
    let path = Path::new(&filename);
    if !path.exists() {
        return format!("Document {} does not exist", filename);
    }

    match document_info(path) {
        Ok(info) => format!(
            "Document: {}\nTitle: {}\nAuthor: {}\nParagraphs: {}\nHeadings: {}\nTables: {}\nCharacters: {}",
            filename,
            info.title.as_deref().unwrap_or("(none)"),
            info.author.as_deref().unwrap_or("(none)"),
            info.paragraphs,
            info.headings,
            info.tables,
            info.characters,
        ),
        Err(e) => format!("Failed to get document info: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_adds_extension() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("Formatting Test");
        let message = create_document(base.to_str().unwrap(), Some("T"), Some("A")).await;

        let expected = format!("{}.docx", base.display());
        assert_eq!(message, format!("Document {} created successfully", expected));
        assert!(Path::new(&expected).exists());
    }

    #[tokio::test]
    async fn test_create_in_missing_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nope").join("doc.docx");
        let message = create_document(target.to_str().unwrap(), None, None).await;
        assert!(message.starts_with("Cannot create document"));
    }

    #[tokio::test]
    async fn test_info_reports_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("info.docx");
        let name = path.to_str().unwrap();
        create_document(name, Some("Formatting Test"), Some("Test Script")).await;

        let info = document_info(&path).unwrap();
        assert_eq!(info.title.as_deref(), Some("Formatting Test"));
        assert_eq!(info.author.as_deref(), Some("Test Script"));
        assert_eq!(info.paragraphs, 0);

        let text = get_document_info(name).await;
        assert!(text.contains("Title: Formatting Test"));
        assert!(text.contains("Author: Test Script"));
    }

    #[tokio::test]
    async fn test_info_missing_document() {
        let message = get_document_info("/nonexistent/missing").await;
        assert_eq!(message, "Document /nonexistent/missing.docx does not exist");
    }
}
