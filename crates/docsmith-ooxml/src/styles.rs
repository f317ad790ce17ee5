//! Style definitions (word/styles.xml)
//!
//! New packages get a small built-in style sheet with `Normal`, `Title` and
//! `Heading1`..`Heading9`. Existing packages are parsed so that paragraph
//! and heading styles can be checked before they are referenced.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::xml::get_attr;

/// Style ID of the default paragraph style
pub const NORMAL_STYLE: &str = "Normal";

/// Collection of styles from a document
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// All styles, keyed by style ID
    styles: HashMap<String, Style>,
    /// Default paragraph style ID
    pub default_paragraph: Option<String>,
}

/// A Word style definition
#[derive(Debug, Clone)]
pub struct Style {
    /// Style ID (used in document references)
    pub id: String,
    /// Display name
    pub name: String,
    /// Style type
    pub style_type: StyleType,
    /// Base style ID (for inheritance)
    pub based_on: Option<String>,
    /// Outline level (for headings, 0-8, where 0 = Heading 1)
    pub outline_level: Option<u8>,
}

/// Type of style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleSheet {
    /// Parse styles from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut stylesheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut current_style: Option<StyleBuilder> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let name = e.local_name();
                    if name.as_ref() == b"style" {
                        let style_type = get_attr(e, b"w:type").map(|t| match t.as_str() {
                            "character" => StyleType::Character,
                            "table" => StyleType::Table,
                            "numbering" => StyleType::Numbering,
                            _ => StyleType::Paragraph,
                        });
                        current_style = Some(StyleBuilder {
                            id: get_attr(e, b"w:styleId"),
                            style_type,
                            is_default: get_attr(e, b"w:default").as_deref() == Some("1"),
                            ..Default::default()
                        });
                    } else if let Some(style) = current_style.as_mut() {
                        match name.as_ref() {
                            b"name" => style.name = get_attr(e, b"w:val"),
                            b"basedOn" => style.based_on = get_attr(e, b"w:val"),
                            b"outlineLvl" => {
                                style.outline_level =
                                    get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                            }
                            _ => {}
                        }
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.local_name().as_ref() == b"style" {
                        if let Some(builder) = current_style.take() {
                            let is_default = builder.is_default;
                            if let Some(style) = builder.build() {
                                if is_default && style.style_type == StyleType::Paragraph {
                                    stylesheet.default_paragraph = Some(style.id.clone());
                                }
                                stylesheet.styles.insert(style.id.clone(), style);
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(stylesheet)
    }

    /// Get a style by ID
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Check whether a style ID is defined
    pub fn contains(&self, id: &str) -> bool {
        self.styles.contains_key(id)
    }

    /// Number of styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// True when the sheet defines no styles
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Find the paragraph style for a heading level (1-9).
    ///
    /// Prefers the conventional `HeadingN` ID, then any paragraph style with
    /// the matching outline level (localized templates use other IDs).
    pub fn heading_style_id(&self, level: u8) -> Option<&str> {
        if !(1..=9).contains(&level) {
            return None;
        }
        let conventional = format!("Heading{}", level);
        if let Some(style) = self.styles.get(&conventional) {
            return Some(style.id.as_str());
        }
        let mut candidates: Vec<&Style> = self
            .styles
            .values()
            .filter(|s| {
                s.style_type == StyleType::Paragraph && s.outline_level == Some(level - 1)
            })
            .collect();
        candidates.sort_by(|a, b| a.id.cmp(&b.id));
        candidates.first().map(|s| s.id.as_str())
    }

    /// Get the heading level (1-9) for a style, if it's a heading
    pub fn heading_level(&self, style_id: &str) -> Option<u8> {
        self.get(style_id)
            .and_then(|s| s.outline_level)
            .map(|l| l + 1)
    }
}

#[derive(Default)]
struct StyleBuilder {
    id: Option<String>,
    name: Option<String>,
    style_type: Option<StyleType>,
    based_on: Option<String>,
    outline_level: Option<u8>,
    is_default: bool,
}

impl StyleBuilder {
    fn build(self) -> Option<Style> {
        let id = self.id?;
        Some(Style {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            style_type: self.style_type.unwrap_or(StyleType::Paragraph),
            based_on: self.based_on,
            outline_level: self.outline_level,
        })
    }
}

/// Built-in heading sizes in half-points, Heading1..Heading9
const HEADING_SIZES: [u32; 9] = [32, 26, 24, 22, 22, 22, 22, 22, 22];

/// The style sheet written into newly created packages
pub fn default_styles_xml() -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>
<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:rPr><w:sz w:val="56"/><w:szCs w:val="56"/></w:rPr></w:style>
"#,
    );

    for (index, half_points) in HEADING_SIZES.iter().enumerate() {
        let level = index + 1;
        xml.push_str(&format!(
            concat!(
                r#"<w:style w:type="paragraph" w:styleId="Heading{0}"><w:name w:val="heading {0}"/>"#,
                r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#,
                r#"<w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="{1}"/></w:pPr>"#,
                r#"<w:rPr><w:b/><w:bCs/><w:color w:val="2F5496"/><w:sz w:val="{2}"/><w:szCs w:val="{2}"/></w:rPr></w:style>"#,
                "\n"
            ),
            level, index, half_points
        ));
    }

    xml.push_str("</w:styles>");
    xml
}
