//! Route pattern compilation and caching.
//!
//! A raw pattern such as `/blog/:slug` is compiled once into a
//! [`CompiledPattern`] holding both an anchored regex (for `:name` / `*`
//! patterns) and a segment list (for bracket and catch-all patterns).
//! [`PatternCache`] keeps compiled patterns alive for the whole run.

use dashmap::DashMap;
use regex::Regex;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use thiserror::Error;

use super::{ParamValue, Params};
use crate::debug;
use crate::utils::url::segments;

// ============================================================================
// Segments
// ============================================================================

/// One `/`-delimited piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment.
    Static(String),
    /// `:name` or `[name]`, matches any single non-empty segment.
    Param(String),
    /// `[...name]`, captures every remaining segment.
    CatchAll(String),
}

impl Segment {
    pub(crate) fn parse(seg: &str) -> Self {
        if let Some(name) = seg.strip_prefix(':') {
            return Self::Param(name.to_owned());
        }
        if seg.len() >= 2 && seg.starts_with('[') && seg.ends_with(']') {
            let inner = &seg[1..seg.len() - 1];
            return match inner.strip_prefix("...") {
                Some(name) => Self::CatchAll(name.to_owned()),
                None => Self::Param(inner.to_owned()),
            };
        }
        Self::Static(seg.to_owned())
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Self::Static(_))
    }
}

// ============================================================================
// CompiledPattern
// ============================================================================

/// A compiled route pattern.
///
/// Invariant: `param_names[i]` is the name of capture group `i + 1` in `regex`.
#[derive(Debug)]
pub struct CompiledPattern {
    raw: String,
    /// `None` when the generated source failed to build; such a pattern never matches.
    regex: Option<Regex>,
    param_names: Vec<String>,
    segments: Vec<Segment>,
}

impl CompiledPattern {
    /// Compile a raw pattern. Never fails: malformed input yields a pattern
    /// that simply does not match anything unexpected.
    pub fn compile(raw: &str) -> Self {
        let (source, param_names) = regex_source(raw);
        let regex = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(e) => {
                debug!("route"; "pattern `{}` will never match: {}", raw, e);
                None
            }
        };

        Self {
            raw: raw.to_owned(),
            regex,
            param_names,
            segments: segments(raw).map(Segment::parse).collect(),
        }
    }

    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[inline]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Position and name of the first catch-all segment.
    pub fn catch_all(&self) -> Option<(usize, &str)> {
        self.segments.iter().enumerate().find_map(|(i, seg)| match seg {
            Segment::CatchAll(name) => Some((i, name.as_str())),
            _ => None,
        })
    }

    /// Whether the pattern uses bracket syntax (`[id]`, `[...slug]`).
    #[inline]
    pub fn has_brackets(&self) -> bool {
        self.raw.contains('[')
    }

    /// Match `path` against the regex form and collect named captures.
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.as_ref()?.captures(path)?;
        let params = self
            .param_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                caps.get(i + 1)
                    .map(|m| (name.clone(), ParamValue::One(m.as_str().to_owned())))
            })
            .collect();
        Some(params)
    }
}

/// Parameter name at the start of `rest` (the text right after a `:`).
///
/// Names start with an ASCII letter or `_` and continue with ASCII
/// alphanumerics or `_`; anything else leaves the `:` literal.
pub(crate) fn param_ident(rest: &str) -> Option<&str> {
    let first = rest.bytes().next()?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let end = rest
        .bytes()
        .position(|b| !(b.is_ascii_alphanumeric() || b == b'_'))
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Build the anchored regex source and the ordered parameter names.
fn regex_source(raw: &str) -> (String, Vec<String>) {
    let mut source = String::with_capacity(raw.len() * 2 + 4);
    let mut names = Vec::new();
    let mut buf = [0u8; 4];

    source.push('^');
    let mut rest = raw;
    while let Some(c) = rest.chars().next() {
        if c == ':'
            && let Some(name) = param_ident(&rest[1..])
        {
            names.push(name.to_owned());
            source.push_str("([^/]+)");
            rest = &rest[1 + name.len()..];
            continue;
        }

        if c == '*' {
            source.push_str(".*");
        } else {
            source.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
        rest = &rest[c.len_utf8()..];
    }
    source.push_str("/?$");

    (source, names)
}

// ============================================================================
// Validation
// ============================================================================

/// Problems found in a pattern at declaration time.
///
/// These are reported as warnings; matching still proceeds with the
/// pattern as written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternIssue {
    #[error("pattern should start with `/`")]
    MissingLeadingSlash,

    #[error("catch-all `{0}` is followed by more segments, which are ignored when matching")]
    CatchAllNotLast(String),

    #[error("segment `{0}` declares an empty parameter name")]
    EmptyParam(String),

    #[error("segment `{0}` has an unbalanced bracket")]
    UnbalancedBracket(String),
}

/// Check a raw pattern for constructs that silently fail to match.
pub fn validate(raw: &str) -> Vec<PatternIssue> {
    let mut issues = Vec::new();

    if !raw.starts_with('/') {
        issues.push(PatternIssue::MissingLeadingSlash);
    }

    let raw_segments: Vec<&str> = segments(raw).collect();
    for (i, seg) in raw_segments.iter().enumerate() {
        let opens = seg.matches('[').count();
        let closes = seg.matches(']').count();
        if opens != closes || (opens > 0 && !(seg.starts_with('[') && seg.ends_with(']'))) {
            issues.push(PatternIssue::UnbalancedBracket((*seg).to_owned()));
            continue;
        }

        match Segment::parse(seg) {
            Segment::Param(name) | Segment::CatchAll(name) if name.is_empty() => {
                issues.push(PatternIssue::EmptyParam((*seg).to_owned()));
            }
            Segment::CatchAll(_) if i + 1 < raw_segments.len() => {
                issues.push(PatternIssue::CatchAllNotLast((*seg).to_owned()));
            }
            _ => {}
        }
    }

    issues
}

// ============================================================================
// PatternCache
// ============================================================================

/// Compiled patterns keyed by their exact raw string.
///
/// Created alongside the matcher and never cleared: route tables are fixed
/// for the duration of a build.
#[derive(Debug, Default)]
pub struct PatternCache {
    patterns: DashMap<String, Arc<CompiledPattern>, FxBuildHasher>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached pattern for `raw`, compiling it on first use.
    pub fn get_or_compile(&self, raw: &str) -> Arc<CompiledPattern> {
        if let Some(hit) = self.patterns.get(raw) {
            return Arc::clone(hit.value());
        }
        let entry = self
            .patterns
            .entry(raw.to_owned())
            .or_insert_with(|| Arc::new(CompiledPattern::compile(raw)));
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
