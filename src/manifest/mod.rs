//! Asset manifest: logical module/asset ids -> built files and their relations.
//!
//! # Module Structure
//!
//! ```text
//! manifest/
//! ├── metafile   # raw bundler output metadata (input)
//! ├── naming     # output classification, key derivation, root stripping
//! ├── resolve    # ManifestResolver (metafile -> Manifest)
//! └── mod.rs     # Manifest, ManifestEntry (this file)
//! ```
//!
//! # Output Shape
//!
//! ```json
//! {
//!   "src/pages/Home.jsx": {
//!     "type": "entry",
//!     "file": "assets/js/Home-1a2b3c4d.js",
//!     "name": "Home",
//!     "src": "src/pages/Home.jsx",
//!     "isEntry": true,
//!     "imports": ["assets/js/vendor-0f0f0f0f.js"],
//!     "preload": ["assets/js/vendor-0f0f0f0f.js"]
//!   },
//!   "_vendor.js": { "type": "chunk", "file": "assets/js/vendor-0f0f0f0f.js" }
//! }
//! ```

pub mod metafile;
pub mod naming;
pub mod resolve;

pub use metafile::Metafile;
pub use resolve::ManifestResolver;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the bucket holding CSS no entry point claims.
pub const SHARED_CSS_KEY: &str = "shared.css";

/// File name of the CSS-only sibling manifest.
pub const CSS_MANIFEST_NAME: &str = "css-manifest.json";

// ============================================================================
// Entries
// ============================================================================

/// One manifest record, discriminated by `"type"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ManifestEntry {
    Entry(EntryPoint),
    Chunk(Chunk),
    Asset(Asset),
    Stylesheet(Stylesheet),
    SharedCss(SharedCss),
}

impl ManifestEntry {
    /// Built file for single-file entries.
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Entry(e) => Some(&e.file),
            Self::Chunk(c) => Some(&c.file),
            Self::Asset(a) => Some(&a.file),
            Self::Stylesheet(s) => Some(&s.file),
            Self::SharedCss(_) => None,
        }
    }

    fn is_css(&self) -> bool {
        matches!(self, Self::Stylesheet(_) | Self::SharedCss(_))
    }
}

/// A route's entry module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    pub file: String,
    pub name: String,
    pub src: String,
    #[serde(default = "always")]
    pub is_entry: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic_imports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub css: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preload: Vec<String>,
}

const fn always() -> bool {
    true
}

/// A shared JS chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub file: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_dynamic_entry: bool,
}

/// A non-code output (image, font, media).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub file: String,
    pub src: String,
}

/// CSS belonging to one page, keyed `<page name>.css`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stylesheet {
    pub file: String,
    pub src: String,
    /// Entry key of the owning page.
    pub page: String,
}

/// CSS no entry point claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedCss {
    pub files: Vec<String>,
    #[serde(default = "always")]
    pub shared: bool,
}

// ============================================================================
// Manifest
// ============================================================================

/// Normalized asset manifest, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&ManifestEntry> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entry-point record for a route's entry key.
    pub fn entry_point(&self, key: &str) -> Option<&EntryPoint> {
        match self.entries.get(key)? {
            ManifestEntry::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    /// Files in the shared CSS bucket.
    pub fn shared_css(&self) -> &[String] {
        match self.entries.get(SHARED_CSS_KEY) {
            Some(ManifestEntry::SharedCss(shared)) => &shared.files,
            _ => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn insert(&mut self, key: String, entry: ManifestEntry) -> Option<ManifestEntry> {
        self.entries.insert(key, entry)
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (&String, &mut ManifestEntry)> {
        self.entries.iter_mut()
    }

    /// Stylesheet-only view (`stylesheet`, `shared-css` and `*.css` keys).
    pub fn css_only(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(key, entry)| entry.is_css() || key.ends_with(".css"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { entries }
    }

    /// Write `manifest.json` and, when `with_css`, the sibling `css-manifest.json`.
    ///
    /// Returns the paths written.
    pub fn write(&self, path: &Path, with_css: bool) -> Result<Vec<PathBuf>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut written = vec![path.to_path_buf()];
        write_json(path, self)?;

        if with_css {
            let css_path = path.with_file_name(CSS_MANIFEST_NAME);
            write_json(&css_path, &self.css_only())?;
            written.push(css_path);
        }

        Ok(written)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid manifest {}", path.display()))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
