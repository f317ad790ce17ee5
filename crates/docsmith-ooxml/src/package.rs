//! The document handle
//!
//! [`DocxPackage`] owns an unpacked package and appends content to its main
//! document part. Content is spliced into `word/document.xml` as text, in
//! front of the body's trailing `w:sectPr` so section settings stay last.
//!
//! # Example
//!
//! ```no_run
//! use docsmith_ooxml::{DocxPackage, RunFormat};
//!
//! let mut package = DocxPackage::new(Some("Report"), Some("Me"));
//! package.append_heading("Summary", 1, &RunFormat::default(), false)?;
//! package.append_paragraph("Body text", None, &RunFormat::default())?;
//! package.save("report.docx")?;
//! # Ok::<(), docsmith_ooxml::OoxmlError>(())
//! ```

use std::io::Cursor;
use std::path::Path;

use tracing::debug;

use crate::archive::{OoxmlArchive, CORE_PROPERTIES_PART, DOCUMENT_PART, STYLES_PART};
use crate::document::{Document, Paragraph};
use crate::error::{OoxmlError, Result};
use crate::format::{ParagraphFormat, RunFormat};
use crate::properties::CoreProperties;
use crate::relationships::Relationships;
use crate::styles::{default_styles_xml, StyleSheet, NORMAL_STYLE};
use crate::xml::escape_xml;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const STYLES_OVERRIDE: &str = r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#;

const EMPTY_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<w:body>
<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>
</w:body>
</w:document>"#;

const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// An editable word-processing package
#[derive(Debug, Clone)]
pub struct DocxPackage {
    archive: OoxmlArchive,
    styles: StyleSheet,
}

impl DocxPackage {
    /// Build an empty document with the built-in style sheet
    pub fn new(title: Option<&str>, author: Option<&str>) -> Self {
        let mut archive = OoxmlArchive::new();

        let mut package_rels = Relationships::new();
        package_rels.add(DOCUMENT_PART, Relationships::TYPE_OFFICE_DOCUMENT);
        package_rels.add(CORE_PROPERTIES_PART, Relationships::TYPE_CORE_PROPERTIES);

        let mut document_rels = Relationships::new();
        document_rels.add("styles.xml", Relationships::TYPE_STYLES);

        let props = CoreProperties {
            title: title.map(str::to_string),
            creator: author.map(str::to_string),
        };

        let styles_xml = default_styles_xml();
        let styles = StyleSheet::parse(styles_xml.as_bytes()).unwrap_or_default();

        archive.set_string("[Content_Types].xml", CONTENT_TYPES);
        archive.set_string("_rels/.rels", package_rels.to_xml());
        archive.set_string(DOCUMENT_RELS_PART, document_rels.to_xml());
        archive.set_string(DOCUMENT_PART, EMPTY_DOCUMENT);
        archive.set_string(STYLES_PART, styles_xml);
        archive.set_string(CORE_PROPERTIES_PART, props.to_xml());

        Self { archive, styles }
    }

    /// Open an existing package from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(OoxmlArchive::open(path)?)
    }

    /// Load a package from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(OoxmlArchive::from_reader(Cursor::new(bytes))?)
    }

    fn from_archive(mut archive: OoxmlArchive) -> Result<Self> {
        let document = archive.get_string(DOCUMENT_PART).ok_or_else(|| {
            OoxmlError::MissingFile(DOCUMENT_PART.to_string())
        })?;
        if !document.contains("<w:body") {
            return Err(OoxmlError::InvalidStructure(
                "word/document.xml has no w:body element".to_string(),
            ));
        }

        let styles = match archive.styles_xml() {
            Some(xml) => StyleSheet::parse(xml)?,
            None => {
                debug!("package has no styles part, adding the built-in style sheet");
                install_default_styles(&mut archive)?
            }
        };

        Ok(Self { archive, styles })
    }

    /// The parsed style sheet
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Title and author from docProps/core.xml
    pub fn core_properties(&self) -> Result<CoreProperties> {
        match self.archive.get(CORE_PROPERTIES_PART) {
            Some(xml) => CoreProperties::parse(xml),
            None => Ok(CoreProperties::default()),
        }
    }

    /// Overwrite title and/or author, keeping other core properties
    pub fn set_core_properties(&mut self, props: &CoreProperties) {
        let updated = match self.archive.get_string(CORE_PROPERTIES_PART) {
            Some(existing) => props.merge_into(&existing),
            None => props.to_xml(),
        };
        self.archive.set_string(CORE_PROPERTIES_PART, updated);
    }

    /// Parse the main document part
    pub fn document(&self) -> Result<Document> {
        Document::parse(self.archive.document_xml()?)
    }

    /// Top-level paragraphs with their formatting
    pub fn paragraphs(&self) -> Result<Vec<Paragraph>> {
        Ok(self.document()?.paragraphs)
    }

    /// Append a body paragraph.
    ///
    /// `style` must name a style in the package; `None` uses the default
    /// paragraph style.
    pub fn append_paragraph(
        &mut self,
        text: &str,
        style: Option<&str>,
        format: &RunFormat,
    ) -> Result<()> {
        if let Some(style_id) = style {
            if !self.styles.contains(style_id) {
                return Err(OoxmlError::InvalidFormat(format!(
                    "style '{}' is not defined in this document",
                    style_id
                )));
            }
        }
        let paragraph = ParagraphFormat {
            style_id: style.filter(|s| *s != NORMAL_STYLE).map(str::to_string),
            border_bottom: false,
        };
        self.append(text, &paragraph, format)
    }

    /// Append a heading paragraph at `level` (1-9)
    pub fn append_heading(
        &mut self,
        text: &str,
        level: u8,
        format: &RunFormat,
        border_bottom: bool,
    ) -> Result<()> {
        if !(1..=9).contains(&level) {
            return Err(OoxmlError::InvalidHeadingLevel(level));
        }
        let style_id = match self.styles.heading_style_id(level) {
            Some(id) => id.to_string(),
            None => {
                self.install_heading_styles()?;
                format!("Heading{}", level)
            }
        };
        let paragraph = ParagraphFormat {
            style_id: Some(style_id),
            border_bottom,
        };
        self.append(text, &paragraph, format)
    }

    fn append(&mut self, text: &str, paragraph: &ParagraphFormat, format: &RunFormat) -> Result<()> {
        format.validate()?;
        let xml = paragraph_xml(text, paragraph, format);
        let document = self.archive.document_xml()?;
        let updated = insert_into_body(&String::from_utf8_lossy(document), &xml)?;
        self.archive.set_string(DOCUMENT_PART, updated);
        debug!(
            style = paragraph.style_id.as_deref().unwrap_or(NORMAL_STYLE),
            chars = text.chars().count(),
            "appended paragraph"
        );
        Ok(())
    }

    /// Add the built-in heading styles to a package whose style sheet lacks them
    fn install_heading_styles(&mut self) -> Result<()> {
        let defaults = default_styles_xml();
        let existing = self
            .archive
            .get_string(STYLES_PART)
            .unwrap_or_else(|| defaults.clone());

        let mut additions = String::new();
        for line in defaults.lines() {
            if let Some(id) = style_id_of(line) {
                if id.starts_with("Heading") && !self.styles.contains(id) {
                    additions.push_str(line);
                    additions.push('\n');
                }
            }
        }

        let updated = match existing.rfind("</w:styles>") {
            Some(pos) => format!("{}{}{}", &existing[..pos], additions, &existing[pos..]),
            None => {
                return Err(OoxmlError::InvalidStructure(
                    "word/styles.xml has no closing w:styles".to_string(),
                ))
            }
        };
        self.styles = StyleSheet::parse(updated.as_bytes())?;
        self.archive.set_string(STYLES_PART, updated);
        Ok(())
    }

    /// Serialize the package
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut output = Cursor::new(Vec::new());
        self.archive.write_to(&mut output)?;
        Ok(output.into_inner())
    }

    /// Write the package to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        debug!(path = %path.as_ref().display(), "saved package");
        Ok(())
    }

    /// The underlying archive
    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }
}

/// Write the built-in style sheet and wire it into content types and relationships
fn install_default_styles(archive: &mut OoxmlArchive) -> Result<StyleSheet> {
    let styles_xml = default_styles_xml();
    let styles = StyleSheet::parse(styles_xml.as_bytes())?;
    archive.set_string(STYLES_PART, styles_xml);

    let mut rels = match archive.get(DOCUMENT_RELS_PART) {
        Some(xml) => Relationships::parse(xml)?,
        None => Relationships::new(),
    };
    if rels.find_by_type(Relationships::TYPE_STYLES).is_none() {
        rels.add("styles.xml", Relationships::TYPE_STYLES);
        archive.set_string(DOCUMENT_RELS_PART, rels.to_xml());
    }

    if let Some(content_types) = archive.get_string("[Content_Types].xml") {
        if !content_types.contains("/word/styles.xml") {
            let updated =
                content_types.replace("</Types>", &format!("  {}\n</Types>", STYLES_OVERRIDE));
            archive.set_string("[Content_Types].xml", updated);
        }
    }

    Ok(styles)
}

/// Pull the `w:styleId` value out of one line of the built-in style sheet
fn style_id_of(line: &str) -> Option<&str> {
    let start = line.find(r#"w:styleId=""#)? + r#"w:styleId=""#.len();
    let end = line[start..].find('"')?;
    Some(&line[start..start + end])
}

/// Build a single-run `<w:p>`
fn paragraph_xml(text: &str, paragraph: &ParagraphFormat, format: &RunFormat) -> String {
    let mut xml = String::from("<w:p>");
    xml.push_str(&paragraph.to_xml());
    if !text.is_empty() {
        xml.push_str("<w:r>");
        xml.push_str(&format.to_xml());
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                xml.push_str("<w:br/>");
            }
            for (j, segment) in line.split('\t').enumerate() {
                if j > 0 {
                    xml.push_str("<w:tab/>");
                }
                if !segment.is_empty() {
                    xml.push_str(&format!(
                        r#"<w:t xml:space="preserve">{}</w:t>"#,
                        escape_xml(segment)
                    ));
                }
            }
        }
        xml.push_str("</w:r>");
    }
    xml.push_str("</w:p>\n");
    xml
}

/// Insert block XML at the end of the body, before a trailing `w:sectPr`
fn insert_into_body(document: &str, block: &str) -> Result<String> {
    let body_end = document.rfind("</w:body>").ok_or_else(|| {
        OoxmlError::InvalidStructure("word/document.xml has no closing w:body".to_string())
    })?;

    // Only a sectPr that is a direct child of the body counts; paragraph-level
    // section breaks live inside w:pPr and end before the last paragraph closes.
    let insert_at = match document[..body_end].rfind("<w:sectPr") {
        Some(pos) if !document[pos..body_end].contains("</w:p>") => pos,
        _ => body_end,
    };

    let mut updated = String::with_capacity(document.len() + block.len());
    updated.push_str(&document[..insert_at]);
    updated.push_str(block);
    updated.push_str(&document[insert_at..]);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_package_has_required_parts() {
        let package = DocxPackage::new(Some("Formatting Test"), Some("Test Script"));
        let archive = package.archive();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            DOCUMENT_RELS_PART,
            DOCUMENT_PART,
            STYLES_PART,
            CORE_PROPERTIES_PART,
        ] {
            assert!(archive.contains(part), "missing {}", part);
        }

        let props = package.core_properties().unwrap();
        assert_eq!(props.title.as_deref(), Some("Formatting Test"));
        assert_eq!(props.creator.as_deref(), Some("Test Script"));
        assert!(package.paragraphs().unwrap().is_empty());
    }

    #[test]
    fn test_set_core_properties_keeps_other_fields() {
        let mut package = DocxPackage::new(Some("Draft"), Some("Test Script"));
        package.set_core_properties(&CoreProperties {
            title: Some("Final".to_string()),
            creator: None,
        });

        let props = package.core_properties().unwrap();
        assert_eq!(props.title.as_deref(), Some("Final"));
        assert_eq!(props.creator.as_deref(), Some("Test Script"));
    }

    #[test]
    fn test_append_keeps_sect_pr_last() {
        let mut package = DocxPackage::new(None, None);
        package
            .append_paragraph("first", None, &RunFormat::default())
            .unwrap();
        package
            .append_paragraph("second", None, &RunFormat::default())
            .unwrap();

        let xml = package.archive().get_string(DOCUMENT_PART).unwrap();
        let second = xml.find("second").unwrap();
        let sect = xml.find("<w:sectPr").unwrap();
        assert!(xml.find("first").unwrap() < second);
        assert!(second < sect);
    }

    #[test]
    fn test_insert_without_sect_pr() {
        let doc = "<w:document><w:body><w:p/></w:body></w:document>";
        let updated = insert_into_body(doc, "<w:p>x</w:p>").unwrap();
        assert_eq!(
            updated,
            "<w:document><w:body><w:p/><w:p>x</w:p></w:body></w:document>"
        );
    }

    #[test]
    fn test_insert_ignores_paragraph_level_sect_pr() {
        let doc = "<w:body><w:p><w:pPr><w:sectPr/></w:pPr></w:p><w:p/></w:body>";
        let updated = insert_into_body(doc, "<X/>").unwrap();
        assert!(updated.ends_with("<w:p/><X/></w:body>"));
    }

    #[test]
    fn test_insert_requires_body() {
        assert!(insert_into_body("<w:document/>", "<w:p/>").is_err());
    }

    #[test]
    fn test_heading_level_validation() {
        let mut package = DocxPackage::new(None, None);
        for level in [0u8, 10] {
            let err = package
                .append_heading("x", level, &RunFormat::default(), false)
                .unwrap_err();
            assert!(matches!(err, OoxmlError::InvalidHeadingLevel(l) if l == level));
        }
    }

    #[test]
    fn test_unknown_style_rejected() {
        let mut package = DocxPackage::new(None, None);
        let err = package
            .append_paragraph("x", Some("NoSuchStyle"), &RunFormat::default())
            .unwrap_err();
        assert!(err.to_string().contains("NoSuchStyle"));
    }

    #[test]
    fn test_paragraph_xml_escapes_and_breaks() {
        let xml = paragraph_xml(
            "a<b>\nc\td",
            &ParagraphFormat::default(),
            &RunFormat::default(),
        );
        assert!(xml.contains("a&lt;b&gt;"));
        assert!(xml.contains("<w:br/>"));
        assert!(xml.contains("<w:tab/>"));
    }

    #[test]
    fn test_style_id_of() {
        assert_eq!(
            style_id_of(r#"<w:style w:type="paragraph" w:styleId="Heading3">"#),
            Some("Heading3")
        );
        assert_eq!(style_id_of("<w:docDefaults>"), None);
    }
}
