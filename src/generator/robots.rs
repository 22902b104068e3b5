//! `robots.txt` generation.

use anyhow::{Context, Result};
use std::fmt::Write;
use std::fs;
use std::path::PathBuf;

use crate::config::SiteConfig;
use crate::log;

/// Write `robots.txt` into the output directory if enabled.
pub fn build_robots(config: &SiteConfig) -> Result<Option<PathBuf>> {
    if !config.build.robots.enable {
        return Ok(None);
    }

    let path = config.build.output.join("robots.txt");
    fs::write(&path, robots_txt(config))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log!("robots"; "robots.txt");
    Ok(Some(path))
}

fn robots_txt(config: &SiteConfig) -> String {
    let mut out = String::from("User-agent: *\nAllow: /\n");

    for path in &config.build.robots.disallow {
        let _ = writeln!(out, "Disallow: {path}");
    }

    if config.build.sitemap.enable
        && let Some(base) = config.site.base_url()
    {
        let sitemap = config.build.sitemap.path.to_string_lossy();
        let _ = writeln!(out, "\nSitemap: {base}/{}", sitemap.trim_start_matches('/'));
    }

    out
}
