//! Route table loading.
//!
//! Routes are declared in declaration order, which also decides ties when
//! matching. Two formats are accepted:
//!
//! ```toml
//! # routes.toml
//! [[route]]
//! path = "/"
//! entry = "./src/pages/Home.jsx"
//! title = "Home"
//!
//! [[route]]
//! path = "/blog/:slug"
//! entry = "./src/pages/Post.jsx"
//! ```
//!
//! ```json
//! [{ "path": "/", "entry": "./src/pages/Home.jsx" }]
//! ```

use anyhow::{Context, Result, bail};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::Route;
use super::pattern::validate;
use crate::log;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRoutes {
    #[serde(default, rename = "route")]
    routes: Vec<Route>,
}

/// Ordered, immutable list of declared routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Load a route table, choosing the format from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table {}", path.display()))?;

        let table = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => bail!(
                "Unsupported route table format `{}` (expected .toml or .json)",
                path.display()
            ),
        }
        .with_context(|| format!("Invalid route table {}", path.display()))?;

        table.report_issues();
        Ok(table)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let parsed: TomlRoutes = toml::from_str(content)?;
        Ok(Self::new(parsed.routes))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let routes: Vec<Route> = serde_json::from_str(content)?;
        Ok(Self::new(routes))
    }

    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Collect declaration-time warnings: pattern issues and duplicate paths.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen = FxHashSet::default();

        for route in &self.routes {
            for issue in validate(&route.path) {
                issues.push(format!("`{}`: {}", route.path, issue));
            }
            if !seen.insert(route.path.as_str()) {
                issues.push(format!(
                    "`{}`: declared more than once, only the first declaration is reachable",
                    route.path
                ));
            }
            if route.entry.trim().is_empty() {
                issues.push(format!("`{}`: empty entry module", route.path));
            }
        }

        issues
    }

    fn report_issues(&self) {
        for issue in self.issues() {
            log!("warning"; "route {}", issue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TOML: &str = r#"
[[route]]
path = "/"
entry = "./src/pages/Home.jsx"
title = "Home"

[[route]]
path = "/blog/:slug"
entry = "./src/pages/Post.jsx"
"#;

    #[test]
    fn test_from_toml_keeps_order() {
        let table = RouteTable::from_toml(TOML).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.routes()[0].path, "/");
        assert_eq!(table.routes()[0].title.as_deref(), Some("Home"));
        assert_eq!(table.routes()[1].entry, "./src/pages/Post.jsx");
    }

    #[test]
    fn test_from_json() {
        let table = RouteTable::from_json(
            r#"[{"path":"/about","entry":"./src/pages/About.jsx","title":"About"}]"#,
        )
        .unwrap();
        assert_eq!(table.routes()[0], Route::new("/about", "./src/pages/About.jsx").with_title("About"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RouteTable::from_toml("[[route]]\npath = \"/\"\nentry = \"a\"\ncomponent = \"x\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_issues() {
        let table = RouteTable::new(vec![
            Route::new("/docs/[...path]/edit", "a"),
            Route::new("/about", "b"),
            Route::new("/about", "c"),
            Route::new("/empty", " "),
        ]);
        let issues = table.issues();
        assert_eq!(issues.len(), 3);
        assert!(issues[0].contains("catch-all"));
        assert!(issues[1].contains("more than once"));
        assert!(issues[2].contains("empty entry"));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = TempDir::new().unwrap();
        let toml_path = dir.path().join("routes.toml");
        fs::write(&toml_path, TOML).unwrap();
        assert_eq!(RouteTable::load(&toml_path).unwrap().len(), 2);

        let yaml_path = dir.path().join("routes.yaml");
        fs::write(&yaml_path, "").unwrap();
        assert!(RouteTable::load(&yaml_path).is_err());

        assert!(RouteTable::load(&dir.path().join("missing.toml")).is_err());
    }
}
