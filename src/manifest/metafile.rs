//! Raw bundler metafile (esbuild `metafile.outputs` shape).
//!
//! ```json
//! {
//!   "outputs": {
//!     "dist/client/assets/js/Home-1a2b3c4d.js": {
//!       "entryPoint": "./src/pages/Home.jsx",
//!       "imports": [{ "path": "dist/client/assets/js/vendor-0f0f0f0f.js", "kind": "import-statement" }],
//!       "cssBundle": "dist/client/assets/css/Home-aa11bb22.css"
//!     }
//!   }
//! }
//! ```
//!
//! Import lists accept both esbuild records and bare path strings. Imports of
//! kind `dynamic-import` count as dynamic imports, like an explicit
//! `dynamicImports` list.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const DYNAMIC_IMPORT_KIND: &str = "dynamic-import";

/// Bundler output metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafile {
    /// Output path -> output metadata. `None` when the bundler wrote no outputs map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<BTreeMap<String, OutputMeta>>,
}

impl Metafile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read metafile {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid metafile {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Metadata for one bundler output file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ImportRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_imports: Vec<ImportRef>,

    #[serde(default, skip_serializing_if = "OneOrMany::is_empty")]
    pub css_bundle: OneOrMany,
}

impl OutputMeta {
    /// Bundled (non-external) static imports.
    pub fn static_imports(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .filter(|i| i.is_bundled() && !i.is_dynamic())
            .map(ImportRef::path)
    }

    /// Bundled dynamic imports from both `dynamicImports` and `dynamic-import` records.
    pub fn dynamic_imports(&self) -> impl Iterator<Item = &str> {
        let from_imports = self.imports.iter().filter(|i| i.is_dynamic());
        self.dynamic_imports
            .iter()
            .chain(from_imports)
            .filter(|i| i.is_bundled())
            .map(ImportRef::path)
    }

    /// Whether this output's CSS bundle list references `css_path`.
    pub fn bundles_css(&self, css_path: &str) -> bool {
        self.css_bundle.iter().any(|p| p == css_path)
    }
}

/// An import edge: an esbuild record or a plain path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportRef {
    Path(String),
    Record {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        external: bool,
    },
}

impl ImportRef {
    pub fn path(&self) -> &str {
        match self {
            Self::Path(path) | Self::Record { path, .. } => path,
        }
    }

    fn is_dynamic(&self) -> bool {
        matches!(self, Self::Record { kind: Some(kind), .. } if kind == DYNAMIC_IMPORT_KIND)
    }

    /// External imports (`react`, CDN URLs) are not bundler outputs.
    fn is_bundled(&self) -> bool {
        !matches!(self, Self::Record { external: true, .. })
    }
}

/// A single path or a list of paths (`cssBundle`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        let slice: &[String] = match self {
            Self::None => &[],
            Self::One(path) => std::slice::from_ref(path),
            Self::Many(paths) => paths,
        };
        slice.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_esbuild_outputs() {
        let metafile = Metafile::from_json(
            r#"{
                "outputs": {
                    "dist/a.js": {
                        "entryPoint": "./src/a.jsx",
                        "bytes": 120,
                        "imports": [
                            { "path": "dist/chunk-1.js", "kind": "import-statement" },
                            { "path": "dist/lazy-2.js", "kind": "dynamic-import" },
                            { "path": "react", "kind": "import-statement", "external": true }
                        ],
                        "cssBundle": "dist/a.css"
                    }
                }
            }"#,
        )
        .unwrap();

        let outputs = metafile.outputs.unwrap();
        let a = &outputs["dist/a.js"];
        assert_eq!(a.entry_point.as_deref(), Some("./src/a.jsx"));
        assert_eq!(a.static_imports().collect::<Vec<_>>(), ["dist/chunk-1.js"]);
        assert_eq!(a.dynamic_imports().collect::<Vec<_>>(), ["dist/lazy-2.js"]);
        assert!(a.bundles_css("dist/a.css"));
    }

    #[test]
    fn test_parse_plain_paths() {
        let metafile = Metafile::from_json(
            r#"{ "outputs": { "dist/b.js": {
                "imports": ["dist/c.js"],
                "dynamicImports": ["dist/d.js"],
                "cssBundle": ["dist/b.css", "dist/shared.css"]
            } } }"#,
        )
        .unwrap();

        let b = &metafile.outputs.unwrap()["dist/b.js"];
        assert_eq!(b.static_imports().collect::<Vec<_>>(), ["dist/c.js"]);
        assert_eq!(b.dynamic_imports().collect::<Vec<_>>(), ["dist/d.js"]);
        assert!(b.bundles_css("dist/shared.css"));
    }

    #[test]
    fn test_missing_outputs() {
        let metafile = Metafile::from_json(r#"{ "inputs": {} }"#).unwrap();
        assert!(metafile.outputs.is_none());
        assert!(OutputMeta::default().css_bundle.is_empty());
    }
}
