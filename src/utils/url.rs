//! URL path helpers shared by the matcher, the expander and the emitter.
//!
//! All functions work on decoded `/`-separated paths and never allocate when
//! the input is already in normal form.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::borrow::Cow;

/// Characters escaped inside a path segment (RFC 3986 unreserved chars stay).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Strip trailing slashes, keeping the root `/`.
///
/// # Examples
/// ```ignore
/// assert_eq!(trim_trailing_slash("/blog/"), "/blog");
/// assert_eq!(trim_trailing_slash("///"), "/");
/// assert_eq!(trim_trailing_slash(""), "/");
/// ```
#[inline]
pub fn trim_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Collapse `//` runs into `/` and strip the trailing slash (root stays `/`).
pub fn collapse_slashes(path: &str) -> Cow<'_, str> {
    if !path.contains("//") && (path == "/" || !path.ends_with('/')) && !path.is_empty() {
        return Cow::Borrowed(path);
    }

    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    Cow::Owned(trim_trailing_slash(&out).to_string())
}

/// Split a path into its non-empty `/`-delimited segments.
#[inline]
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strip a leading `./` from a module identifier.
#[inline]
pub fn strip_dot_slash(id: &str) -> &str {
    id.strip_prefix("./").unwrap_or(id)
}

/// Last path component (`a/b/c.js` -> `c.js`).
#[inline]
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split a file name into stem and extension (`c.min.js` -> `("c.min", Some("js"))`).
#[inline]
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// Percent-encode each segment of a decoded path, keeping the `/` separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
