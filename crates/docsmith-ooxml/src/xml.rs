//! Small XML helpers shared by the part readers and writers

use quick_xml::events::BytesStart;

/// Escape special XML characters for text content and attribute values
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Get an attribute value by its qualified name (e.g. `w:val`)
pub(crate) fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Interpret an OOXML on/off property (`<w:b/>`, `<w:b w:val="0"/>`, ...)
pub(crate) fn on_off(e: &BytesStart) -> bool {
    !matches!(
        get_attr(e, b"w:val").as_deref(),
        Some("0") | Some("false") | Some("off")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_on_off() {
        assert!(on_off(&BytesStart::new("w:b")));
        assert!(on_off(&BytesStart::from_content(r#"w:b w:val="1""#, 3)));
        assert!(!on_off(&BytesStart::from_content(r#"w:b w:val="0""#, 3)));
        assert!(!on_off(&BytesStart::from_content(r#"w:i w:val="false""#, 3)));
    }
}
