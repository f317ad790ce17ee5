//! Run and paragraph formatting
//!
//! Direct formatting is written as `w:rPr` / `w:pPr` children. Every run
//! property is tri-state: `None` leaves the value to the paragraph style,
//! `Some(false)` switches an inherited toggle off explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{OoxmlError, Result};
use crate::xml::escape_xml;

/// Largest size Word accepts, in points (`w:sz` is capped at 3276 half-points)
pub const MAX_FONT_SIZE_PT: f32 = 1638.0;

/// An RGB colour as written in `w:color/@w:val`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Uppercase hex form without a leading `#`
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for Color {
    type Err = OoxmlError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || OoxmlError::InvalidFormat(format!("color '{}' is not six hex digits", s));
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Color([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Character formatting applied to a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunFormat {
    /// Font family applied to all scripts
    pub font_name: Option<String>,
    /// Font size in points
    pub font_size: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<Color>,
}

impl RunFormat {
    /// Check that every value can be expressed in OOXML
    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.font_size {
            if !(size > 0.0 && size <= MAX_FONT_SIZE_PT) {
                return Err(OoxmlError::InvalidFormat(format!(
                    "font size {} must be greater than 0 and at most {}",
                    size, MAX_FONT_SIZE_PT
                )));
            }
        }
        if let Some(name) = &self.font_name {
            if name.trim().is_empty() {
                return Err(OoxmlError::InvalidFormat(
                    "font name must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// True when no property is set
    pub fn is_empty(&self) -> bool {
        self.font_name.is_none()
            && self.font_size.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.color.is_none()
    }

    /// Font size as OOXML half-points
    pub fn half_points(&self) -> Option<u32> {
        self.font_size.map(|pt| (pt * 2.0).round() as u32)
    }

    /// Render `<w:rPr>` or an empty string when nothing is set.
    ///
    /// Children follow the CT_RPr sequence order: rFonts, b, i, color, sz.
    pub fn to_xml(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut xml = String::from("<w:rPr>");
        if let Some(name) = &self.font_name {
            let name = escape_xml(name);
            xml.push_str(&format!(
                r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:eastAsia="{0}" w:cs="{0}"/>"#,
                name
            ));
        }
        if let Some(bold) = self.bold {
            xml.push_str(&toggle("b", bold));
            xml.push_str(&toggle("bCs", bold));
        }
        if let Some(italic) = self.italic {
            xml.push_str(&toggle("i", italic));
            xml.push_str(&toggle("iCs", italic));
        }
        if let Some(color) = self.color {
            xml.push_str(&format!(r#"<w:color w:val="{}"/>"#, color.to_hex()));
        }
        if let Some(half_points) = self.half_points() {
            xml.push_str(&format!(
                r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
                half_points
            ));
        }
        xml.push_str("</w:rPr>");
        xml
    }
}

fn toggle(tag: &str, on: bool) -> String {
    if on {
        format!("<w:{}/>", tag)
    } else {
        format!(r#"<w:{} w:val="0"/>"#, tag)
    }
}

/// Paragraph-level formatting
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParagraphFormat {
    /// Paragraph style ID (references styles.xml)
    pub style_id: Option<String>,
    /// Draw a single rule under the paragraph
    pub border_bottom: bool,
}

impl ParagraphFormat {
    /// Format with only a style
    pub fn styled(style_id: impl Into<String>) -> Self {
        Self {
            style_id: Some(style_id.into()),
            border_bottom: false,
        }
    }

    /// Render `<w:pPr>` or an empty string when nothing is set.
    ///
    /// `pStyle` must precede `pBdr` inside CT_PPr.
    pub fn to_xml(&self) -> String {
        if self.style_id.is_none() && !self.border_bottom {
            return String::new();
        }

        let mut xml = String::from("<w:pPr>");
        if let Some(style) = &self.style_id {
            xml.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, escape_xml(style)));
        }
        if self.border_bottom {
            xml.push_str(
                r#"<w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="auto"/></w:pBdr>"#,
            );
        }
        xml.push_str("</w:pPr>");
        xml
    }
}
