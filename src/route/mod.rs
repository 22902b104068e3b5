//! Route declarations and URL matching.
//!
//! # Module Structure
//!
//! ```text
//! route/
//! ├── pattern    # PathPattern compiler + PatternCache
//! ├── matcher    # RouteMatcher (specificity scoring)
//! ├── table      # routes.toml / routes.json loading
//! └── mod.rs     # Route, RouteMatch, ParamValue (this file)
//! ```
//!
//! # Pattern Syntax
//!
//! | Segment       | Example              | Captures                    |
//! |---------------|----------------------|-----------------------------|
//! | static        | `/about`             | nothing                     |
//! | named         | `/blog/:slug`        | one segment                 |
//! | bracket       | `/blog/[slug]`       | one segment                 |
//! | catch-all     | `/docs/[...path]`    | all remaining segments      |
//! | wildcard      | `/files/*`           | anything (not captured)     |

pub mod matcher;
pub mod pattern;
pub mod table;

pub use matcher::RouteMatcher;
pub use pattern::{CompiledPattern, PatternCache, PatternIssue};
pub use table::RouteTable;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::url::strip_dot_slash;

/// Extracted route parameters, ordered by name.
pub type Params = BTreeMap<String, ParamValue>;

/// A declared route: URL pattern -> page module.
///
/// The page component itself is not held here. It is loaded lazily from
/// `entry` through a [`ModuleLoader`](crate::page::ModuleLoader) when the
/// route is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Route {
    /// URL pattern (`/`, `/about`, `/blog/:slug`, `/docs/[...path]`).
    pub path: String,
    /// Source module identifier (`./src/pages/Home.jsx`).
    pub entry: String,
    /// Document title for this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Route {
    pub fn new(path: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entry: entry.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Manifest key for this route's entry module (leading `./` stripped).
    #[inline]
    pub fn entry_key(&self) -> &str {
        strip_dot_slash(&self.entry)
    }

    /// Whether the pattern contains any dynamic marker (`:`, `[`, `*`).
    ///
    /// Static routes only ever match by string equality.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.path.contains([':', '[', '*'])
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// A single parameter value: one segment, or the ordered segments of a catch-all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

impl ParamValue {
    /// Value as it appears in a URL path (catch-all segments joined by `/`).
    pub fn to_path(&self) -> String {
        match self {
            Self::One(s) => s.clone(),
            Self::Many(parts) => parts.join("/"),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::One(s) => Some(s),
            Self::Many(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::One(s.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::One(s)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(parts: Vec<String>) -> Self {
        Self::Many(parts)
    }
}

/// Result of matching a path against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Params,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_entry_key() {
        let route = Route::new("/", "./src/pages/Home.jsx");
        assert_eq!(route.entry_key(), "src/pages/Home.jsx");
        assert!(!route.is_dynamic());
    }

    #[test]
    fn test_route_is_dynamic() {
        assert!(Route::new("/blog/:slug", "a").is_dynamic());
        assert!(Route::new("/blog/[slug]", "a").is_dynamic());
        assert!(Route::new("/files/*", "a").is_dynamic());
        assert!(!Route::new("/about", "a").is_dynamic());
    }

    #[test]
    fn test_param_value_json() {
        let one: ParamValue = serde_json::from_str(r#""hello""#).unwrap();
        assert_eq!(one, ParamValue::from("hello"));

        let many: ParamValue = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(many.to_path(), "a/b");
        assert_eq!(many.as_str(), None);
    }
}
