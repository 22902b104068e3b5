//! Sitemap generation.
//!
//! Lists every emitted page for search engine indexing.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/blog/hello</loc>
//!   </url>
//! </urlset>
//! ```

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use crate::config::SiteConfig;
use crate::log;
use crate::utils::url::encode_path;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Write `sitemap.xml` for `pages` (URL paths) if enabled.
pub fn build_sitemap(config: &SiteConfig, pages: &[String]) -> Result<Option<PathBuf>> {
    if !config.build.sitemap.enable {
        return Ok(None);
    }

    let base_url = config.site.base_url().unwrap_or_default();
    let sitemap = Sitemap::new(base_url, pages);
    let path = config.build.output.join(&config.build.sitemap.path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&path, sitemap.into_xml())
        .with_context(|| format!("Failed to write sitemap to {}", path.display()))?;

    log!("sitemap"; "{} urls", pages.len());
    Ok(Some(path))
}

struct Sitemap {
    urls: Vec<String>,
}

impl Sitemap {
    fn new(base_url: &str, pages: &[String]) -> Self {
        let mut urls: Vec<String> = pages
            .iter()
            .map(|path| format!("{base_url}{}", encode_path(path)))
            .collect();
        urls.sort();
        urls.dedup();
        Self { urls }
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(128 + self.urls.len() * 64);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for loc in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&loc));
            xml.push_str("</loc>\n  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
