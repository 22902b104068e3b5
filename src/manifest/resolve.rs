//! Metafile -> Manifest resolution.
//!
//! Three passes over the bundler outputs (ordered by output path):
//!
//! 1. **CSS association**: every `.css` output is attached to its own entry
//!    point, else to each entry whose `cssBundle` lists it, else to the shared
//!    bucket.
//! 2. **Entries**: entry modules, per-page stylesheets, shared chunks and
//!    static assets.
//! 3. **Preload**: an entry's imports that are themselves manifest files.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;

use super::metafile::{Metafile, OutputMeta};
use super::naming::{OutputKind, OutputRoots, asset_key, chunk_key, disambiguate};
use super::{
    Asset, Chunk, EntryPoint, Manifest, ManifestEntry, SHARED_CSS_KEY, SharedCss, Stylesheet,
};
use crate::utils::hash::file_hash;
use crate::utils::url::{basename, split_extension, strip_dot_slash};
use crate::{debug, log};

/// Converts bundler metafiles into [`Manifest`]s.
#[derive(Debug, Clone, Default)]
pub struct ManifestResolver {
    roots: OutputRoots,
}

/// CSS output paths grouped by owner.
#[derive(Default)]
struct CssBuckets<'m> {
    by_entry: FxHashMap<&'m str, Vec<&'m str>>,
    shared: Vec<&'m str>,
}

impl ManifestResolver {
    pub fn new(roots: OutputRoots) -> Self {
        Self { roots }
    }

    /// Resolve a metafile. Returns `None` (after logging a warning) when the
    /// metafile has no `outputs` map.
    pub fn resolve(&self, metafile: &Metafile) -> Option<Manifest> {
        let Some(outputs) = metafile.outputs.as_ref() else {
            log!("warning"; "metafile has no outputs, skipping manifest generation");
            return None;
        };

        let css = associate_css(outputs);
        let dynamic_targets: FxHashSet<&str> = outputs
            .values()
            .flat_map(OutputMeta::dynamic_imports)
            .collect();

        let mut manifest = Manifest::new();

        for (path, meta) in outputs {
            let kind = OutputKind::of(path);
            match (kind, meta.entry_point.as_deref()) {
                (OutputKind::SourceMap, _) => {}
                (OutputKind::Script, Some(entry)) => {
                    self.add_entry(&mut manifest, outputs, path, meta, entry, &css);
                }
                (OutputKind::Script, None) => {
                    let chunk = Chunk {
                        file: self.rel(path),
                        imports: meta.static_imports().map(|p| self.rel(p)).collect(),
                        is_dynamic_entry: dynamic_targets.contains(path.as_str()),
                    };
                    insert_unique(&mut manifest, chunk_key(path), path, ManifestEntry::Chunk(chunk));
                }
                // handled in the association pass
                (OutputKind::Stylesheet | OutputKind::Html, _) => {}
                (OutputKind::Asset, _) => {
                    let key = asset_key(path).into_owned();
                    let asset = Asset {
                        file: self.rel(path),
                        src: key.clone(),
                    };
                    insert_unique(&mut manifest, key, path, ManifestEntry::Asset(asset));
                }
            }
        }

        if !css.shared.is_empty() {
            let shared = SharedCss {
                files: css.shared.iter().map(|p| self.rel(p)).collect(),
                shared: true,
            };
            manifest.insert(SHARED_CSS_KEY.to_owned(), ManifestEntry::SharedCss(shared));
        }

        attach_preloads(&mut manifest);

        debug!("manifest"; "resolved {} outputs into {} entries", outputs.len(), manifest.len());
        Some(manifest)
    }

    fn add_entry(
        &self,
        manifest: &mut Manifest,
        outputs: &BTreeMap<String, OutputMeta>,
        path: &str,
        meta: &OutputMeta,
        entry_point: &str,
        css: &CssBuckets<'_>,
    ) {
        let key = strip_dot_slash(entry_point);
        let name = split_extension(basename(entry_point)).0.to_owned();
        let page_css = css.by_entry.get(key).map(Vec::as_slice).unwrap_or_default();

        let assets = outputs
            .iter()
            .filter(|(p, m)| {
                OutputKind::of(p) == OutputKind::Asset
                    && m.entry_point.as_deref() == Some(entry_point)
            })
            .map(|(p, _)| self.rel(p))
            .collect();

        let entry = EntryPoint {
            file: self.rel(path),
            name: name.clone(),
            src: key.to_owned(),
            is_entry: true,
            imports: meta.static_imports().map(|p| self.rel(p)).collect(),
            dynamic_imports: meta.dynamic_imports().map(|p| self.rel(p)).collect(),
            css: page_css.iter().map(|p| self.rel(p)).collect(),
            assets,
            preload: Vec::new(),
        };

        for css_path in page_css {
            let css_key = format!("{name}.css");
            let sheet = Stylesheet {
                file: self.rel(css_path),
                src: css_key.clone(),
                page: key.to_owned(),
            };
            insert_unique(manifest, css_key, css_path, ManifestEntry::Stylesheet(sheet));
        }

        if manifest.insert(key.to_owned(), ManifestEntry::Entry(entry)).is_some() {
            log!("warning"; "entry `{}` produced by more than one output, keeping {}", key, path);
        }
    }

    #[inline]
    fn rel(&self, path: &str) -> String {
        self.roots.relative(path).to_owned()
    }
}

fn associate_css(outputs: &BTreeMap<String, OutputMeta>) -> CssBuckets<'_> {
    let mut buckets = CssBuckets::default();

    for (path, meta) in outputs {
        if OutputKind::of(path) != OutputKind::Stylesheet {
            continue;
        }

        if let Some(entry) = meta.entry_point.as_deref() {
            buckets.by_entry.entry(strip_dot_slash(entry)).or_default().push(path);
            continue;
        }

        let owners: Vec<&str> = outputs
            .values()
            .filter(|other| other.bundles_css(path))
            .filter_map(|other| other.entry_point.as_deref())
            .map(strip_dot_slash)
            .collect();

        if owners.is_empty() {
            buckets.shared.push(path);
        } else {
            for owner in owners {
                buckets.by_entry.entry(owner).or_default().push(path);
            }
        }
    }

    buckets
}

/// Insert under `key`, or under a hash-disambiguated key if `key` is taken.
fn insert_unique(manifest: &mut Manifest, key: String, output: &str, entry: ManifestEntry) {
    if !manifest.contains_key(&key) {
        manifest.insert(key, entry);
        return;
    }

    let unique = disambiguate(&key, &file_hash(output));
    debug!("manifest"; "key `{}` already taken, using `{}` for {}", key, unique, output);
    if manifest.insert(unique.clone(), entry).is_some() {
        log!("warning"; "manifest key `{}` collides, {} overwrites it", unique, output);
    }
}

fn attach_preloads(manifest: &mut Manifest) {
    let files: FxHashSet<String> = manifest
        .iter()
        .filter_map(|(_, entry)| entry.file())
        .map(str::to_owned)
        .collect();

    for (_, entry) in manifest.entries_mut() {
        if let ManifestEntry::Entry(entry) = entry {
            entry.preload = entry
                .imports
                .iter()
                .filter(|import| files.contains(import.as_str()))
                .cloned()
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ManifestResolver {
        ManifestResolver::new(OutputRoots::new(["dist/client/", "dist/"]))
    }

    fn resolve(json: &str) -> Manifest {
        let metafile = Metafile::from_json(json).unwrap();
        resolver().resolve(&metafile).unwrap()
    }

    #[test]
    fn test_entry_with_vendor_import() {
        let manifest = resolve(
            r#"{ "outputs": {
                "dist/client/assets/js/Home-abc123.js": {
                    "entryPoint": "./src/Home.jsx",
                    "imports": [{ "path": "dist/client/assets/js/vendor-def456.js", "kind": "import-statement" }]
                },
                "dist/client/assets/js/vendor-def456.js": {}
            } }"#,
        );

        let home = manifest.entry_point("src/Home.jsx").unwrap();
        assert_eq!(home.file, "assets/js/Home-abc123.js");
        assert_eq!(home.name, "Home");
        assert_eq!(home.src, "src/Home.jsx");
        assert!(home.is_entry);
        assert_eq!(home.imports, ["assets/js/vendor-def456.js"]);
        assert_eq!(home.preload, ["assets/js/vendor-def456.js"]);

        match manifest.get("_vendor.js") {
            Some(ManifestEntry::Chunk(chunk)) => {
                assert_eq!(chunk.file, "assets/js/vendor-def456.js");
                assert!(!chunk.is_dynamic_entry);
            }
            other => panic!("expected chunk, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_outputs() {
        let metafile = Metafile::from_json("{}").unwrap();
        assert!(resolver().resolve(&metafile).is_none());
    }

    #[test]
    fn test_css_ownership() {
        let manifest = resolve(
            r#"{ "outputs": {
                "dist/Home-11111111.js": { "entryPoint": "./src/Home.jsx", "cssBundle": "dist/Home-22222222.css" },
                "dist/About-33333333.js": { "entryPoint": "./src/About.jsx" },
                "dist/About-44444444.css": { "entryPoint": "./src/About.jsx" },
                "dist/Home-22222222.css": {},
                "dist/base-55555555.css": {}
            } }"#,
        );

        assert_eq!(manifest.entry_point("src/Home.jsx").unwrap().css, ["Home-22222222.css"]);
        assert_eq!(manifest.entry_point("src/About.jsx").unwrap().css, ["About-44444444.css"]);

        match manifest.get("Home.css") {
            Some(ManifestEntry::Stylesheet(sheet)) => {
                assert_eq!(sheet.file, "Home-22222222.css");
                assert_eq!(sheet.page, "src/Home.jsx");
            }
            other => panic!("expected stylesheet, got {other:?}"),
        }

        assert_eq!(manifest.shared_css(), ["base-55555555.css"]);
    }

    #[test]
    fn test_css_shared_by_two_entries() {
        let manifest = resolve(
            r#"{ "outputs": {
                "dist/A-11111111.js": { "entryPoint": "./src/A.jsx", "cssBundle": ["dist/common-99999999.css"] },
                "dist/B-22222222.js": { "entryPoint": "./src/B.jsx", "cssBundle": ["dist/common-99999999.css"] },
                "dist/common-99999999.css": {}
            } }"#,
        );

        assert_eq!(manifest.entry_point("src/A.jsx").unwrap().css, ["common-99999999.css"]);
        assert_eq!(manifest.entry_point("src/B.jsx").unwrap().css, ["common-99999999.css"]);
        assert!(manifest.shared_css().is_empty());
    }

    #[test]
    fn test_dynamic_chunk() {
        let manifest = resolve(
            r#"{ "outputs": {
                "dist/Home-11111111.js": {
                    "entryPoint": "./src/Home.jsx",
                    "imports": [{ "path": "dist/Chart-22222222.js", "kind": "dynamic-import" }]
                },
                "dist/Chart-22222222.js": {}
            } }"#,
        );

        let home = manifest.entry_point("src/Home.jsx").unwrap();
        assert!(home.imports.is_empty());
        assert_eq!(home.dynamic_imports, ["Chart-22222222.js"]);
        assert!(home.preload.is_empty());

        match manifest.get("_Chart.js") {
            Some(ManifestEntry::Chunk(chunk)) => assert!(chunk.is_dynamic_entry),
            other => panic!("expected chunk, got {other:?}"),
        }
    }

    #[test]
    fn test_assets_and_source_maps() {
        let manifest = resolve(
            r#"{ "outputs": {
                "dist/Home-11111111.js": { "entryPoint": "./src/Home.jsx" },
                "dist/Home-11111111.js.map": {},
                "dist/img/logo-1a2b3c4d.png": { "entryPoint": "./src/Home.jsx" },
                "dist/index.html": {}
            } }"#,
        );

        match manifest.get("logo.png") {
            Some(ManifestEntry::Asset(asset)) => {
                assert_eq!(asset.file, "img/logo-1a2b3c4d.png");
                assert_eq!(asset.src, "logo.png");
            }
            other => panic!("expected asset, got {other:?}"),
        }
        assert_eq!(
            manifest.entry_point("src/Home.jsx").unwrap().assets,
            ["img/logo-1a2b3c4d.png"]
        );
        // entry + asset; no map, no html
        assert_eq!(manifest.len(), 2);
    }

    #[test]
    fn test_key_collision_disambiguated() {
        let manifest = resolve(
            r#"{ "outputs": {
                "dist/a/logo-1a2b3c4d.png": {},
                "dist/b/logo-5e6f7a8b.png": {}
            } }"#,
        );

        assert_eq!(manifest.get("logo.png").and_then(ManifestEntry::file), Some("a/logo-1a2b3c4d.png"));
        assert_eq!(
            manifest.get("logo-5e6f7a8b.png").and_then(ManifestEntry::file),
            Some("b/logo-5e6f7a8b.png")
        );
    }

    #[test]
    fn test_external_imports_dropped() {
        let manifest = resolve(
            r#"{ "outputs": {
                "dist/Home-11111111.js": {
                    "entryPoint": "./src/Home.jsx",
                    "imports": [{ "path": "react", "kind": "import-statement", "external": true }]
                }
            } }"#,
        );
        assert!(manifest.entry_point("src/Home.jsx").unwrap().imports.is_empty());
    }
}
