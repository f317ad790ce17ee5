//! Document content parsing (word/document.xml)
//!
//! Reads the body paragraphs back together with their direct formatting,
//! so callers can verify what was written. Paragraphs nested in tables are
//! not part of [`Document::paragraphs`], matching what word processors
//! report as the document's paragraph list.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::error::{OoxmlError, Result};
use crate::format::{Color, RunFormat};
use crate::xml::{get_attr, on_off};

/// A parsed Word document body
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    /// Top-level paragraphs in document order
    pub paragraphs: Vec<Paragraph>,
    /// Number of top-level tables skipped while parsing
    pub tables: usize,
}

/// A paragraph with its style and runs
#[derive(Debug, Clone, Default, Serialize)]
pub struct Paragraph {
    /// Style ID (references styles.xml)
    pub style_id: Option<String>,
    /// Whether the paragraph carries a bottom border
    pub border_bottom: bool,
    pub runs: Vec<Run>,
}

/// A text run with its direct formatting
#[derive(Debug, Clone, Default, Serialize)]
pub struct Run {
    pub text: String,
    pub format: RunFormat,
}

impl Document {
    /// Parse a document from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        // Whitespace inside <w:t> is content
        reader.config_mut().trim_text(false);

        let mut doc = Document::default();
        let mut buf = Vec::new();

        let mut in_body = false;
        let mut table_depth = 0u32;
        let mut in_paragraph_props = false;
        let mut in_border = false;
        let mut in_text = false;
        let mut current_para: Option<Paragraph> = None;
        let mut current_run: Option<Run> = None;

        loop {
            let event = reader.read_event_into(&mut buf);
            match event {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let is_empty = matches!(event, Ok(Event::Empty(_)));
                    match e.local_name().as_ref() {
                        b"body" => in_body = !is_empty,
                        b"tbl" if in_body => {
                            if table_depth == 0 {
                                doc.tables += 1;
                            }
                            table_depth += 1;
                        }
                        b"p" if in_body && table_depth == 0 => {
                            let para = Paragraph::default();
                            if is_empty {
                                doc.paragraphs.push(para);
                            } else {
                                current_para = Some(para);
                            }
                        }
                        b"pPr" if current_para.is_some() => in_paragraph_props = !is_empty,
                        b"pStyle" if in_paragraph_props => {
                            if let Some(para) = current_para.as_mut() {
                                para.style_id = get_attr(e, b"w:val");
                            }
                        }
                        b"pBdr" if in_paragraph_props => in_border = !is_empty,
                        b"bottom" if in_border => {
                            let visible = !matches!(
                                get_attr(e, b"w:val").as_deref(),
                                Some("none") | Some("nil")
                            );
                            if let Some(para) = current_para.as_mut() {
                                para.border_bottom = visible;
                            }
                        }
                        b"r" if current_para.is_some() => {
                            if !is_empty {
                                current_run = Some(Run::default());
                            }
                        }
                        _ => {
                            if let Some(run) = current_run.as_mut() {
                                apply_run_element(run, e);
                                if e.local_name().as_ref() == b"t" && !is_empty {
                                    in_text = true;
                                }
                            }
                        }
                    }
                }
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"body" => in_body = false,
                    b"tbl" if table_depth > 0 => table_depth -= 1,
                    b"pPr" => in_paragraph_props = false,
                    b"pBdr" => in_border = false,
                    b"t" => in_text = false,
                    b"r" => {
                        if let (Some(run), Some(para)) = (current_run.take(), current_para.as_mut())
                        {
                            para.runs.push(run);
                        }
                    }
                    b"p" if table_depth == 0 => {
                        if let Some(para) = current_para.take() {
                            doc.paragraphs.push(para);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(ref e)) if in_text => {
                    if let Some(run) = current_run.as_mut() {
                        run.text.push_str(&e.unescape()?);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(doc)
    }

    /// Plain text of all paragraphs, one per line
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Paragraph {
    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Formatting of the first run, which is what single-run paragraphs carry
    pub fn first_run_format(&self) -> Option<&RunFormat> {
        self.runs.first().map(|r| &r.format)
    }
}

/// Fold a child element of `w:r` into the run
fn apply_run_element(run: &mut Run, e: &BytesStart) {
    match e.local_name().as_ref() {
        b"rFonts" => {
            run.format.font_name = get_attr(e, b"w:ascii").or_else(|| get_attr(e, b"w:hAnsi"));
        }
        b"sz" => {
            run.format.font_size = get_attr(e, b"w:val")
                .and_then(|v| v.parse::<u32>().ok())
                .map(|half_points| half_points as f32 / 2.0);
        }
        b"b" => run.format.bold = Some(on_off(e)),
        b"i" => run.format.italic = Some(on_off(e)),
        b"color" => {
            run.format.color = get_attr(e, b"w:val").and_then(|v| v.parse::<Color>().ok());
        }
        b"tab" => run.text.push('\t'),
        b"br" | b"cr" => run.text.push('\n'),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn parse(body: &str) -> Document {
        let xml = format!(r#"<?xml version="1.0"?><w:document {}><w:body>{}</w:body></w:document>"#, NS, body);
        Document::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_simple_paragraph() {
        let doc = parse("<w:p><w:r><w:t>Hello, world!</w:t></w:r></w:p>");
        assert_eq!(doc.paragraphs.len(), 1);
        assert_eq!(doc.plain_text(), "Hello, world!");
        assert!(doc.paragraphs[0].first_run_format().unwrap().is_empty());
    }

    #[test]
    fn test_parse_run_formatting() {
        let doc = parse(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/><w:pBdr><w:bottom w:val="single" w:sz="6"/></w:pBdr></w:pPr>
               <w:r><w:rPr><w:rFonts w:ascii="Helvetica" w:hAnsi="Helvetica"/><w:b/><w:i w:val="0"/><w:color w:val="0000FF"/><w:sz w:val="28"/></w:rPr><w:t>SKILLS</w:t></w:r></w:p>"#,
        );

        let para = &doc.paragraphs[0];
        assert_eq!(para.style_id.as_deref(), Some("Heading2"));
        assert!(para.border_bottom);

        let format = para.first_run_format().unwrap();
        assert_eq!(format.font_name.as_deref(), Some("Helvetica"));
        assert_eq!(format.font_size, Some(14.0));
        assert_eq!(format.bold, Some(true));
        assert_eq!(format.italic, Some(false));
        assert_eq!(format.color, Some(Color([0, 0, 255])));
    }

    #[test]
    fn test_paragraph_mark_properties_are_not_run_properties() {
        let doc = parse(
            r#"<w:p><w:pPr><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:t>plain</w:t></w:r></w:p>"#,
        );
        assert_eq!(doc.paragraphs[0].runs[0].format.bold, None);
    }

    #[test]
    fn test_tables_are_skipped() {
        let doc = parse(
            r#"<w:p><w:r><w:t>before</w:t></w:r></w:p>
               <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
               <w:p><w:r><w:t>after</w:t></w:r></w:p>"#,
        );
        assert_eq!(doc.tables, 1);
        assert_eq!(doc.plain_text(), "before\nafter");
    }

    #[test]
    fn test_empty_paragraph_and_escapes() {
        let doc = parse(r#"<w:p/><w:p><w:r><w:t xml:space="preserve">a &amp; b </w:t><w:tab/><w:t>c</w:t></w:r></w:p>"#);
        assert_eq!(doc.paragraphs.len(), 2);
        assert!(doc.paragraphs[0].runs.is_empty());
        assert_eq!(doc.paragraphs[1].text(), "a & b \tc");
    }

    #[test]
    fn test_auto_color_is_ignored() {
        let doc = parse(r#"<w:p><w:r><w:rPr><w:color w:val="auto"/></w:rPr><w:t>x</w:t></w:r></w:p>"#);
        assert_eq!(doc.paragraphs[0].runs[0].format.color, None);
    }
}
