//! Core document properties (docProps/core.xml)

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

use crate::error::{OoxmlError, Result};
use crate::xml::escape_xml;

const CORE_PROPERTIES_OPEN: &str = r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#;

/// Title and author metadata of a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoreProperties {
    /// `dc:title`
    pub title: Option<String>,
    /// `dc:creator`
    pub creator: Option<String>,
}

impl CoreProperties {
    /// Parse the title and creator out of core.xml
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut props = CoreProperties::default();
        let mut buf = Vec::new();
        let mut current: Option<&'static str> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    current = match e.local_name().as_ref() {
                        b"title" => Some("title"),
                        b"creator" => Some("creator"),
                        _ => None,
                    };
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().map_err(OoxmlError::Xml)?.into_owned();
                    match current {
                        Some("title") => props.title = Some(text),
                        Some("creator") => props.creator = Some(text),
                        _ => {}
                    }
                }
                Ok(Event::End(_)) => current = None,
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(props)
    }

    /// Serialize a fresh core.xml
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(CORE_PROPERTIES_OPEN);
        if let Some(title) = &self.title {
            xml.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
        }
        if let Some(creator) = &self.creator {
            xml.push_str(&format!("<dc:creator>{}</dc:creator>", escape_xml(creator)));
        }
        xml.push_str("</cp:coreProperties>");
        xml
    }

    /// Write these values into an existing core.xml, keeping every other element
    pub fn merge_into(&self, existing: &str) -> String {
        let mut updated = existing.to_string();
        if let Some(title) = &self.title {
            updated = replace_or_insert(&updated, "dc:title", title);
        }
        if let Some(creator) = &self.creator {
            updated = replace_or_insert(&updated, "dc:creator", creator);
        }
        updated
    }
}

/// Replace the text of `<tag>...</tag>` or append the element before the closing root
fn replace_or_insert(xml: &str, tag: &str, value: &str) -> String {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let element = format!("{}{}{}", open, escape_xml(value), close);

    if let Some(start) = xml.find(&open) {
        if let Some(end) = xml[start..].find(&close) {
            let end_pos = start + end + close.len();
            return format!("{}{}{}", &xml[..start], element, &xml[end_pos..]);
        }
    }
    // Self-closing form, e.g. <dc:title/>
    let empty = format!("<{}/>", tag);
    if xml.contains(&empty) {
        return xml.replacen(&empty, &element, 1);
    }
    xml.replace(
        "</cp:coreProperties>",
        &format!("{}</cp:coreProperties>", element),
    )
}
