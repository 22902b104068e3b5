//! `[build]` section: input/output locations and generated files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};

/// `[build]` configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Route table (`.toml` or `.json`).
    pub routes: PathBuf,
    /// Bundler metafile read to produce the manifest.
    pub metafile: PathBuf,
    /// Manifest output path.
    pub manifest: PathBuf,
    /// Also write `css-manifest.json` next to the manifest.
    pub css_manifest: bool,
    /// Static HTML output directory.
    pub output: PathBuf,
    /// Prefixes stripped from bundler output paths, tried in order.
    pub output_roots: Vec<String>,
    /// Extra stylesheet hrefs added to every page.
    pub styles: Vec<String>,
    /// Extra module script srcs added to every page.
    pub scripts: Vec<String>,
    pub sitemap: SitemapConfig,
    pub robots: RobotsConfig,

    /// Remove the output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            routes: "src/routes.toml".into(),
            metafile: ".tessera/meta.json".into(),
            manifest: ".tessera/manifest.json".into(),
            css_manifest: true,
            output: "dist".into(),
            output_roots: [".tessera/client/", ".tessera/", "dist/client/", "dist/"]
                .map(String::from)
                .to_vec(),
            styles: Vec::new(),
            scripts: Vec::new(),
            sitemap: SitemapConfig::default(),
            robots: RobotsConfig::default(),
            clean: false,
        }
    }
}

/// `[build.sitemap]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    pub enable: bool,
    /// Output path relative to the output directory.
    pub path: PathBuf,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enable: false,
            path: "sitemap.xml".into(),
        }
    }
}

/// `[build.robots]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    pub enable: bool,
    /// Path prefixes listed as `Disallow:`.
    pub disallow: Vec<String>,
}

impl BuildSectionConfig {
    const OUTPUT_ROOTS: FieldPath = FieldPath::new("build.output_roots");
    const OUTPUT: FieldPath = FieldPath::new("build.output");
    const SITEMAP_PATH: FieldPath = FieldPath::new("build.sitemap.path");
    const DISALLOW: FieldPath = FieldPath::new("build.robots.disallow");

    /// Resolve relative paths against the project root.
    pub fn normalize(&mut self, root: &Path) {
        for path in [
            &mut self.routes,
            &mut self.metafile,
            &mut self.manifest,
            &mut self.output,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.output.as_os_str().is_empty() {
            diag.error(Self::OUTPUT, "must not be empty");
        }

        for root in &self.output_roots {
            if !root.ends_with('/') {
                diag.error_with_hint(
                    Self::OUTPUT_ROOTS,
                    format!("`{root}` does not end with `/`"),
                    format!("use \"{root}/\""),
                );
            }
        }

        if self.sitemap.enable && self.sitemap.path.is_absolute() {
            diag.error(Self::SITEMAP_PATH, "must be relative to the output directory");
        }

        for path in &self.robots.disallow {
            if !path.starts_with('/') {
                diag.warn(Self::DISALLOW, format!("`{path}` does not start with `/`"));
            }
        }
    }
}
