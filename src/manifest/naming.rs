//! Output path classification and manifest key derivation.

use std::borrow::Cow;

use crate::utils::hash::{HASH_LEN, is_lower_hex};
use crate::utils::url::{basename, split_extension};

/// What kind of artifact a bundler output is, judged by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Script,
    Stylesheet,
    Html,
    SourceMap,
    /// Images, fonts, media and anything else.
    Asset,
}

impl OutputKind {
    pub fn of(path: &str) -> Self {
        match split_extension(basename(path)).1 {
            Some("js" | "mjs") => Self::Script,
            Some("css") => Self::Stylesheet,
            Some("html") => Self::Html,
            Some("map") => Self::SourceMap,
            _ => Self::Asset,
        }
    }
}

/// Strips known output-root prefixes so manifest paths are relative to the
/// served directory (`dist/client/assets/a.js` -> `assets/a.js`).
#[derive(Debug, Clone, Default)]
pub struct OutputRoots {
    roots: Vec<String>,
}

impl OutputRoots {
    /// Roots are tried in order; put longer prefixes first.
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn relative<'a>(&self, path: &'a str) -> &'a str {
        let path = path.strip_prefix("./").unwrap_or(path);
        self.roots
            .iter()
            .find_map(|root| path.strip_prefix(root.as_str()))
            .unwrap_or(path)
    }
}

/// Shared chunk key: `_<basename minus -hex suffix>.js`.
pub fn chunk_key(path: &str) -> String {
    let (stem, _) = split_extension(basename(path));
    let name = match stem.rsplit_once('-') {
        Some((name, hash)) if !name.is_empty() && is_lower_hex(hash) => name,
        _ => stem,
    };
    format!("_{name}.js")
}

/// Asset key: the basename with an 8-hex `-xxxxxxxx` suffix removed from the stem.
pub fn asset_key(path: &str) -> Cow<'_, str> {
    let name = basename(path);
    let (stem, ext) = split_extension(name);
    match strip_hash_suffix(stem) {
        Some(original) => match ext {
            Some(ext) => Cow::Owned(format!("{original}.{ext}")),
            None => Cow::Owned(original.to_owned()),
        },
        None => Cow::Borrowed(name),
    }
}

fn strip_hash_suffix(stem: &str) -> Option<&str> {
    let (name, hash) = stem.rsplit_once('-')?;
    (!name.is_empty() && hash.len() == HASH_LEN && is_lower_hex(hash)).then_some(name)
}

/// Insert a hash before the extension to make a colliding key unique.
pub fn disambiguate(key: &str, hash: &str) -> String {
    match split_extension(key) {
        (stem, Some(ext)) => format!("{stem}-{hash}.{ext}"),
        (stem, None) => format!("{stem}-{hash}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_kind() {
        assert_eq!(OutputKind::of("dist/a-1.js"), OutputKind::Script);
        assert_eq!(OutputKind::of("dist/a.mjs"), OutputKind::Script);
        assert_eq!(OutputKind::of("dist/a.css"), OutputKind::Stylesheet);
        assert_eq!(OutputKind::of("dist/index.html"), OutputKind::Html);
        assert_eq!(OutputKind::of("dist/a.js.map"), OutputKind::SourceMap);
        assert_eq!(OutputKind::of("dist/logo.png"), OutputKind::Asset);
        assert_eq!(OutputKind::of("dist/LICENSE"), OutputKind::Asset);
    }

    #[test]
    fn test_relative() {
        let roots = OutputRoots::new(["dist/client/", "dist/"]);
        assert_eq!(roots.relative("dist/client/assets/a.js"), "assets/a.js");
        assert_eq!(roots.relative("dist/server.js"), "server.js");
        assert_eq!(roots.relative("./dist/client/a.js"), "a.js");
        assert_eq!(roots.relative("other/a.js"), "other/a.js");
    }

    #[test]
    fn test_chunk_key() {
        assert_eq!(chunk_key("dist/assets/js/vendor-def456.js"), "_vendor.js");
        assert_eq!(chunk_key("dist/react-dom-0a1b2c3d.js"), "_react-dom.js");
        assert_eq!(chunk_key("dist/chunk.js"), "_chunk.js");
        assert_eq!(chunk_key("dist/chunk-XYZ.js"), "_chunk-XYZ.js");
    }

    #[test]
    fn test_asset_key() {
        assert_eq!(asset_key("dist/img/logo-1a2b3c4d.png"), "logo.png");
        assert_eq!(asset_key("dist/fonts/inter-var-0123abcd.woff2"), "inter-var.woff2");
        assert_eq!(asset_key("dist/img/logo.png"), "logo.png");
        // only an 8-hex suffix counts as a hash
        assert_eq!(asset_key("dist/img/icon-abc.svg"), "icon-abc.svg");
    }

    #[test]
    fn test_disambiguate() {
        assert_eq!(disambiguate("logo.png", "1a2b3c4d"), "logo-1a2b3c4d.png");
        assert_eq!(disambiguate("_vendor.js", "0f0f0f0f"), "_vendor-0f0f0f0f.js");
        assert_eq!(disambiguate("LICENSE", "0f0f0f0f"), "LICENSE-0f0f0f0f");
    }
}
