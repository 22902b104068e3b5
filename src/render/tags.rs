//! `<link>` / `<script>` tags for a page's entry module.

use std::fmt::Write;

use rustc_hash::FxHashSet;

use crate::manifest::Manifest;
use crate::utils::html::escape_attr;

/// User-configured assets appended to every page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtraAssets<'a> {
    pub styles: &'a [String],
    pub scripts: &'a [String],
}

/// Head tags for the page whose entry module is `entry_key`.
///
/// Order: entry stylesheets, shared stylesheets, extra styles, module
/// preloads (entry file, imports, remaining preload files), the entry
/// script, extra scripts. Without a manifest or a matching entry only the
/// extras are emitted.
pub fn asset_tags(manifest: Option<&Manifest>, entry_key: &str, extra: ExtraAssets<'_>) -> String {
    let mut out = String::new();
    let entry = manifest.and_then(|m| m.entry_point(entry_key));

    if let (Some(manifest), Some(entry)) = (manifest, entry) {
        for css in entry.css.iter().chain(manifest.shared_css()) {
            stylesheet(&mut out, &format!("/{css}"));
        }
    }
    for href in extra.styles {
        stylesheet(&mut out, href);
    }

    if let Some(entry) = entry {
        let mut seen = FxHashSet::default();
        let preloads = std::iter::once(&entry.file)
            .chain(&entry.imports)
            .chain(&entry.preload);
        for file in preloads {
            if seen.insert(file.as_str()) {
                let _ = writeln!(
                    out,
                    r#"<link rel="modulepreload" crossorigin href="/{}">"#,
                    escape_attr(file)
                );
            }
        }
        script(&mut out, &format!("/{}", entry.file));
    }
    for src in extra.scripts {
        script(&mut out, src);
    }

    out
}

fn stylesheet(out: &mut String, href: &str) {
    let _ = writeln!(out, r#"<link rel="stylesheet" href="{}">"#, escape_attr(href));
}

fn script(out: &mut String, src: &str) {
    let _ = writeln!(out, r#"<script type="module" src="{}"></script>"#, escape_attr(src));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ManifestResolver, Metafile};
    use crate::manifest::naming::OutputRoots;

    fn manifest() -> Manifest {
        let metafile = Metafile::from_json(
            r#"{ "outputs": {
                "dist/Home-11111111.js": {
                    "entryPoint": "./src/Home.jsx",
                    "imports": ["dist/vendor-22222222.js"],
                    "cssBundle": "dist/Home-33333333.css"
                },
                "dist/vendor-22222222.js": {},
                "dist/Home-33333333.css": {},
                "dist/base-44444444.css": {}
            } }"#,
        )
        .unwrap();
        ManifestResolver::new(OutputRoots::new(["dist/"]))
            .resolve(&metafile)
            .unwrap()
    }

    #[test]
    fn test_entry_tags() {
        let manifest = manifest();
        let tags = asset_tags(Some(&manifest), "src/Home.jsx", ExtraAssets::default());
        let lines: Vec<&str> = tags.lines().collect();

        assert_eq!(
            lines,
            [
                r#"<link rel="stylesheet" href="/Home-33333333.css">"#,
                r#"<link rel="stylesheet" href="/base-44444444.css">"#,
                r#"<link rel="modulepreload" crossorigin href="/Home-11111111.js">"#,
                r#"<link rel="modulepreload" crossorigin href="/vendor-22222222.js">"#,
                r#"<script type="module" src="/Home-11111111.js"></script>"#,
            ]
        );
    }

    #[test]
    fn test_without_manifest_only_extras() {
        let styles = vec!["https://cdn.example.com/a.css".to_owned()];
        let scripts = vec!["/analytics.js".to_owned()];
        let extra = ExtraAssets {
            styles: &styles,
            scripts: &scripts,
        };

        let tags = asset_tags(None, "src/Home.jsx", extra);
        assert_eq!(
            tags,
            "<link rel=\"stylesheet\" href=\"https://cdn.example.com/a.css\">\n\
             <script type=\"module\" src=\"/analytics.js\"></script>\n"
        );

        // unknown entry behaves the same
        assert_eq!(asset_tags(Some(&manifest()), "src/Nope.jsx", extra), tags);
    }
}
