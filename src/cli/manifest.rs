//! `tessera manifest`: resolve the bundler metafile without rendering.

use anyhow::{Context, Result, bail};

use crate::config::SiteConfig;
use crate::log;
use crate::manifest::{Manifest, ManifestResolver, Metafile};

/// Resolve `build.metafile` and write the manifest, or print it with `stdout`.
pub fn run(config: &SiteConfig, stdout: bool) -> Result<()> {
    let manifest = resolve(config)?;

    if stdout {
        let json = serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        println!("{json}");
        return Ok(());
    }

    for path in manifest.write(&config.build.manifest, config.build.css_manifest)? {
        log!("manifest"; "wrote {}", config.root_relative(&path).display());
    }
    Ok(())
}

fn resolve(config: &SiteConfig) -> Result<Manifest> {
    let metafile = Metafile::load(&config.build.metafile)?;
    match ManifestResolver::new(config.output_roots()).resolve(&metafile) {
        Some(manifest) => Ok(manifest),
        None => bail!(
            "metafile {} has no outputs, nothing to resolve",
            config.build.metafile.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &TempDir, metafile: &str) -> SiteConfig {
        fs::write(dir.path().join("meta.json"), metafile).unwrap();
        let mut config = SiteConfig::default();
        config.build.metafile = dir.path().join("meta.json");
        config.build.manifest = dir.path().join("out/manifest.json");
        config
    }

    #[test]
    fn test_writes_manifest_files() {
        let dir = TempDir::new().unwrap();
        let config = config(
            &dir,
            r#"{ "outputs": { "dist/Home-abcd1234.js": { "entryPoint": "src/Home.jsx" } } }"#,
        );

        run(&config, false).unwrap();

        let manifest = Manifest::load(&dir.path().join("out/manifest.json")).unwrap();
        assert_eq!(manifest.entry_point("src/Home.jsx").unwrap().file, "Home-abcd1234.js");
        assert!(dir.path().join("out/css-manifest.json").exists());
    }

    #[test]
    fn test_no_outputs_is_error() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, "{}");
        assert!(run(&config, false).is_err());
        assert!(!dir.path().join("out").exists());
    }
}
