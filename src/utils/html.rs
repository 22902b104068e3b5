//! HTML escaping for generated documents.
//!
//! - `escape()`, `escape_attr()`: entity escaping for text and attribute values
//! - `script_json()`: JSON safe to embed inside an inline `<script>`

use std::borrow::Cow;

use serde::Serialize;

const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Borrows when nothing needs escaping.
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape an attribute value. Same character set as [`escape`].
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape(s)
}

/// Serialize `value` as JSON with `<`, `>` and `&` written as unicode escapes,
/// so the output cannot close the surrounding `<script>` element.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let json = serde_json::to_string(value)?;
    if !json.contains(['<', '>', '&']) {
        return Ok(json);
    }

    let mut out = String::with_capacity(json.len() + 16);
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape() {
        assert_eq!(escape("hello world"), "hello world");
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("a\"b&c"), "a&quot;b&amp;c");
    }

    #[test]
    fn test_script_json() {
        let value = json!({ "html": "</script><script>alert(1)</script>", "n": 1 });
        let out = script_json(&value).unwrap();
        assert!(!out.contains("</script>"));
        assert!(out.contains("\\u003c/script\\u003e"));

        // still valid JSON with the same content
        let back: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(back, value);

        assert_eq!(script_json(&json!({ "a": 1 })).unwrap(), r#"{"a":1}"#);
    }
}
