//! Config field paths for diagnostics.

/// Dotted path to a config field (`build.sitemap.path`).
///
/// Sections declare these as associated constants next to their
/// `validate` method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldPath(&'static str);

impl FieldPath {
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

