//! Writing rendered pages to the output directory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::utils::url::segments;

/// Receives each rendered page.
#[async_trait]
pub trait Emitter: Send + Sync {
    /// Persist `html` for the URL `route_path`, returning where it went.
    async fn emit(&self, route_path: &str, html: &str) -> Result<PathBuf>;
}

/// Writes `index.html` files mirroring the URL structure.
///
/// ```text
/// /            -> <output>/index.html
/// /blog/hello  -> <output>/blog/hello/index.html
/// ```
#[derive(Debug, Clone)]
pub struct FsEmitter {
    output: PathBuf,
}

impl FsEmitter {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Output file for a URL path. `..` and `.` segments are dropped.
    pub fn file_for(&self, route_path: &str) -> PathBuf {
        let mut path = self.output.clone();
        for seg in segments(route_path).filter(|s| !matches!(*s, "." | "..")) {
            path.push(seg);
        }
        path.push("index.html");
        path
    }
}

#[async_trait]
impl Emitter for FsEmitter {
    async fn emit(&self, route_path: &str, html: &str) -> Result<PathBuf> {
        let file = self.file_for(route_path);
        if let Some(dir) = file.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        tokio::fs::write(&file, html)
            .await
            .with_context(|| format!("Failed to write {}", file.display()))?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_for() {
        let emitter = FsEmitter::new("/out");
        assert_eq!(emitter.file_for("/"), PathBuf::from("/out/index.html"));
        assert_eq!(emitter.file_for("/blog/hello"), PathBuf::from("/out/blog/hello/index.html"));
        assert_eq!(emitter.file_for("/a/../../etc"), PathBuf::from("/out/a/etc/index.html"));
    }

    #[tokio::test]
    async fn test_emit_writes_nested() {
        let dir = TempDir::new().unwrap();
        let emitter = FsEmitter::new(dir.path());

        let file = emitter.emit("/docs/guide", "<p>hi</p>").await.unwrap();
        assert_eq!(file, dir.path().join("docs/guide/index.html"));
        assert_eq!(std::fs::read_to_string(file).unwrap(), "<p>hi</p>");
    }
}
