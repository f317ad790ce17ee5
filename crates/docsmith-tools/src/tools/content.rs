//! Paragraph and heading tools, and the formatting read-back report

use std::fmt::Write as _;
use std::path::Path;

use docsmith_ooxml::{Color, DocxPackage, OoxmlError, RunFormat};
use serde::Serialize;
use tracing::{debug, warn};

use crate::util::{check_file_writeable, ensure_docx_extension, preview};

/// Characters of paragraph text shown in the formatting report
const PREVIEW_CHARS: usize = 50;

/// Literal formatting for [`add_paragraph`]
#[derive(Debug, Clone, Default)]
pub struct ParagraphOptions {
    /// Paragraph style name; unknown names fall back to Normal
    pub style: Option<String>,
    pub font_name: Option<String>,
    /// Size in points
    pub font_size: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// RGB hex such as `0000FF`
    pub color: Option<String>,
}

/// Literal formatting for [`add_heading`]
#[derive(Debug, Clone)]
pub struct HeadingOptions {
    /// Heading level, 1 to 9
    pub level: u8,
    pub font_name: Option<String>,
    pub font_size: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<String>,
    /// Draw a single line under the heading
    pub border_bottom: bool,
}

impl Default for HeadingOptions {
    fn default() -> Self {
        Self {
            level: 1,
            font_name: None,
            font_size: None,
            bold: None,
            italic: None,
            color: None,
            border_bottom: false,
        }
    }
}

fn run_format(
    font_name: &Option<String>,
    font_size: Option<f32>,
    bold: Option<bool>,
    italic: Option<bool>,
    color: &Option<String>,
) -> Result<RunFormat, OoxmlError> {
    let format = RunFormat {
        font_name: font_name.clone(),
        font_size,
        bold,
        italic,
        color: color.as_deref().map(str::parse::<Color>).transpose()?,
    };
    format.validate()?;
    Ok(format)
}

impl ParagraphOptions {
    fn run_format(&self) -> Result<RunFormat, OoxmlError> {
        run_format(&self.font_name, self.font_size, self.bold, self.italic, &self.color)
    }
}

impl HeadingOptions {
    fn run_format(&self) -> Result<RunFormat, OoxmlError> {
        run_format(&self.font_name, self.font_size, self.bold, self.italic, &self.color)
    }
}

/// Open an existing document, apply `edit`, save it and return its message.
///
/// Precondition failures and errors from `edit` come back as messages
/// prefixed with `action`.
fn edit_document<F>(filename: &str, action: &str, edit: F) -> String
where
    F: FnOnce(&mut DocxPackage, &str) -> Result<String, OoxmlError>,
{
    let filename = ensure_docx_extension(filename);
    let path = Path::new(&filename);

    if !path.exists() {
        return format!("Document {} does not exist", filename);
    }
    if let Err(reason) = check_file_writeable(path) {
        return format!(
            "Cannot modify document: {}. Consider creating a copy first.",
            reason
        );
    }

    let result = DocxPackage::open(path).and_then(|mut package| {
        let message = edit(&mut package, &filename)?;
        package.save(path)?;
        Ok(message)
    });
    match result {
        Ok(message) => message,
        Err(e) => {
            warn!(document = %filename, error = %e, "{} failed", action);
            format!("Failed to {}: {}", action, e)
        }
    }
}

/// Append a paragraph with optional style and direct run formatting
pub async fn add_paragraph(filename: &str, text: &str, options: &ParagraphOptions) -> String {
    edit_document(filename, "add paragraph", |package, filename| {
        let format = options.run_format()?;
        let (style, note) = match options.style.as_deref() {
            Some(style) if !package.styles().contains(style) => {
                debug!(style, "unknown paragraph style, using Normal");
                (
                    None,
                    format!(" (style '{}' not found, used Normal)", style),
                )
            }
            style => (style, String::new()),
        };
        package.append_paragraph(text, style, &format)?;
        Ok(format!("Paragraph added to {}{}", filename, note))
    })
}

/// Append a heading at `options.level` with direct run formatting
pub async fn add_heading(filename: &str, text: &str, options: &HeadingOptions) -> String {
    edit_document(filename, "add heading", |package, filename| {
        let format = options.run_format()?;
        package.append_heading(text, options.level, &format, options.border_bottom)?;
        Ok(format!(
            "Heading '{}' (level {}) added to {}",
            text, options.level, filename
        ))
    })
}

/// First-run formatting of one paragraph
#[derive(Debug, Clone, Serialize)]
pub struct ParagraphReport {
    /// Position among all top-level paragraphs, from 0
    pub index: usize,
    pub preview: String,
    pub style_id: Option<String>,
    pub border_bottom: bool,
    pub font_name: Option<String>,
    pub font_size: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<Color>,
}

/// Formatting of every paragraph that has at least one run
pub fn paragraph_formatting(path: &Path) -> Result<Vec<ParagraphReport>, OoxmlError> {
    let package = DocxPackage::open(path)?;
    let reports = package
        .paragraphs()?
        .into_iter()
        .enumerate()
        .filter_map(|(index, paragraph)| {
            let format = paragraph.first_run_format()?.clone();
            Some(ParagraphReport {
                index,
                preview: preview(&paragraph.text(), PREVIEW_CHARS),
                style_id: paragraph.style_id,
                border_bottom: paragraph.border_bottom,
                font_name: format.font_name,
                font_size: format.font_size,
                bold: format.bold,
                italic: format.italic,
                color: format.color,
            })
        })
        .collect();
    Ok(reports)
}

fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "inherited".to_string(), |v| v.to_string())
}

/// Human-readable formatting report
pub async fn describe_formatting(filename: &str) -> String {
    let filename = ensure_docx_extension(filename);
    let path = Path::new(&filename);
    if !path.exists() {
        return format!("Document {} does not exist", filename);
    }

    let reports = match paragraph_formatting(path) {
        Ok(reports) => reports,
        Err(e) => return format!("Failed to read formatting: {}", e),
    };

    let mut out = String::new();
    for report in &reports {
        let _ = writeln!(out, "Paragraph {}: {}", report.index, report.preview);
        let _ = writeln!(out, "  Font: {}", show(report.font_name.as_deref()));
        let _ = writeln!(
            out,
            "  Size: {}",
            show(report.font_size.map(|s| format!("{}pt", s)))
        );
        let _ = writeln!(out, "  Bold: {}", show(report.bold));
        let _ = writeln!(out, "  Italic: {}", show(report.italic));
        if let Some(color) = report.color {
            let _ = writeln!(out, "  Color: {}", color);
        }
        if report.border_bottom {
            let _ = writeln!(out, "  Border: bottom");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::document::create_document;
    use tempfile::TempDir;

    async fn new_doc(dir: &TempDir) -> String {
        let path = dir.path().join("content.docx");
        let name = path.to_str().unwrap().to_string();
        create_document(&name, None, None).await;
        name
    }

    #[tokio::test]
    async fn test_add_paragraph_missing_document() {
        let dir = TempDir::new().unwrap();
        let name = dir.path().join("absent").to_str().unwrap().to_string();
        let message = add_paragraph(&name, "x", &ParagraphOptions::default()).await;
        assert_eq!(message, format!("Document {}.docx does not exist", name));
    }

    #[tokio::test]
    async fn test_unknown_style_falls_back_to_normal() {
        let dir = TempDir::new().unwrap();
        let name = new_doc(&dir).await;
        let options = ParagraphOptions {
            style: Some("Fancy Quote".to_string()),
            ..Default::default()
        };
        let message = add_paragraph(&name, "quoted", &options).await;
        assert!(message.starts_with("Paragraph added to"));
        assert!(message.contains("not found, used Normal"));

        let reports = paragraph_formatting(Path::new(&name)).unwrap();
        assert_eq!(reports[0].style_id, None);
    }

    #[tokio::test]
    async fn test_invalid_color_is_reported() {
        let dir = TempDir::new().unwrap();
        let name = new_doc(&dir).await;
        let options = ParagraphOptions {
            color: Some("blue".to_string()),
            ..Default::default()
        };
        let message = add_paragraph(&name, "x", &options).await;
        assert!(message.starts_with("Failed to add paragraph"));
        assert!(paragraph_formatting(Path::new(&name)).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_heading_level_out_of_range() {
        let dir = TempDir::new().unwrap();
        let name = new_doc(&dir).await;
        let options = HeadingOptions {
            level: 10,
            ..Default::default()
        };
        let message = add_heading(&name, "Too deep", &options).await;
        assert!(message.contains("Invalid heading level: 10"));
    }

    #[tokio::test]
    async fn test_heading_message_and_report() {
        let dir = TempDir::new().unwrap();
        let name = new_doc(&dir).await;
        let options = HeadingOptions {
            level: 2,
            font_name: Some("Helvetica".to_string()),
            font_size: Some(14.0),
            bold: Some(true),
            border_bottom: true,
            ..Default::default()
        };
        let message = add_heading(&name, "SKILLS", &options).await;
        assert_eq!(
            message,
            format!("Heading 'SKILLS' (level 2) added to {}", name)
        );

        let report = describe_formatting(&name).await;
        assert!(report.contains("Paragraph 0: SKILLS"));
        assert!(report.contains("Font: Helvetica"));
        assert!(report.contains("Size: 14pt"));
        assert!(report.contains("Bold: true"));
        assert!(report.contains("Italic: inherited"));
        assert!(report.contains("Border: bottom"));
    }
}
