//! Page module loading.
//!
//! [`ModuleLoader`] turns a route's `entry` into a [`PageModule`]. Two
//! implementations ship:
//!
//! - [`MemoryLoader`]: an in-process registry, used for tests and embedding.
//! - [`CommandLoader`]: drives an external SSR runtime, one process per hook
//!   call:
//!
//! ```text
//! <command...> paths  <entry>            stdout: StaticPaths | null
//! <command...> props  <entry>  < params  stdout: object | null
//! <command...> render <entry>  < props   stdout: "<html string>"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::{PageModule, PageProps, StaticPaths};
use crate::debug;
use crate::route::{Params, Route};
use crate::utils::exec::{Cmd, ExecError};
use crate::utils::url::strip_dot_slash;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("page module `{0}` not found")]
    NotFound(String),

    #[error("`{action}` failed for `{entry}`")]
    Command {
        entry: String,
        action: &'static str,
        #[source]
        source: ExecError,
    },

    #[error("`{action}` for `{entry}` produced invalid JSON")]
    InvalidOutput {
        entry: String,
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode input for `{entry}`")]
    Encode {
        entry: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolves a route's entry module.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load(&self, route: &Route) -> Result<Arc<dyn PageModule>>;

    /// Loader name for log output.
    fn name(&self) -> &'static str;
}

// ============================================================================
// MemoryLoader
// ============================================================================

/// Page modules registered in-process, keyed by normalized entry.
#[derive(Default, Clone)]
pub struct MemoryLoader {
    modules: Arc<RwLock<FxHashMap<String, Arc<dyn PageModule>>>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` under `entry` (`./src/Home.jsx` and `src/Home.jsx` are the same key).
    pub fn register(&self, entry: &str, module: impl PageModule + 'static) {
        self.modules
            .write()
            .insert(strip_dot_slash(entry).to_owned(), Arc::new(module));
    }

    pub fn with(self, entry: &str, module: impl PageModule + 'static) -> Self {
        self.register(entry, module);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ModuleLoader for MemoryLoader {
    async fn load(&self, route: &Route) -> Result<Arc<dyn PageModule>> {
        let module = self.modules.read().get(route.entry_key()).cloned();
        module.ok_or_else(|| LoaderError::NotFound(route.entry.clone()).into())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

// ============================================================================
// CommandLoader
// ============================================================================

/// Loads page modules through an external SSR command.
#[derive(Debug, Clone)]
pub struct CommandLoader {
    command: Vec<String>,
    root: PathBuf,
}

impl CommandLoader {
    /// `command` is the program plus leading args (`["node", "ssr.mjs"]`);
    /// entries resolve and the command runs relative to `root`.
    pub fn new(command: Vec<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            command,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ModuleLoader for CommandLoader {
    async fn load(&self, route: &Route) -> Result<Arc<dyn PageModule>> {
        let entry = route.entry_key();
        let source = self.root.join(entry);

        if !tokio::fs::try_exists(&source).await.unwrap_or(false) {
            return Err(LoaderError::NotFound(route.entry.clone()).into());
        }

        debug!("loader"; "{} -> {}", route.entry, source.display());
        Ok(Arc::new(CommandPage {
            command: self.command.clone(),
            root: self.root.clone(),
            entry: entry.to_owned(),
        }))
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

/// One page module backed by the SSR command.
struct CommandPage {
    command: Vec<String>,
    root: PathBuf,
    entry: String,
}

impl CommandPage {
    async fn call<T: DeserializeOwned>(
        &self,
        action: &'static str,
        input: Option<&impl serde::Serialize>,
    ) -> Result<T, LoaderError> {
        let mut cmd = Cmd::from_slice(self.command.as_slice())
            .args([action, self.entry.as_str()])
            .cwd(&self.root);

        if let Some(input) = input {
            let json = serde_json::to_vec(input).map_err(|source| LoaderError::Encode {
                entry: self.entry.clone(),
                source,
            })?;
            cmd = cmd.stdin(json);
        }

        let output = cmd.run().await.map_err(|source| LoaderError::Command {
            entry: self.entry.clone(),
            action,
            source,
        })?;

        serde_json::from_slice(&output.stdout).map_err(|source| LoaderError::InvalidOutput {
            entry: self.entry.clone(),
            action,
            source,
        })
    }
}

#[async_trait]
impl PageModule for CommandPage {
    async fn static_paths(&self) -> Result<Option<StaticPaths>> {
        Ok(self.call("paths", None::<&()>).await?)
    }

    async fn static_props(&self, params: &Params) -> Result<Option<Value>> {
        let props: Option<Value> = self.call("props", Some(params)).await?;
        Ok(props.filter(|v| !v.is_null()))
    }

    async fn render(&self, props: &PageProps) -> Result<String> {
        Ok(self.call("render", Some(props)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Hello;

    #[async_trait]
    impl PageModule for Hello {
        async fn render(&self, _props: &PageProps) -> Result<String> {
            Ok("<h1>hello</h1>".into())
        }
    }

    #[tokio::test]
    async fn test_memory_loader() {
        let loader = MemoryLoader::new().with("./src/Home.jsx", Hello);
        assert_eq!(loader.len(), 1);

        let module = loader.load(&Route::new("/", "src/Home.jsx")).await.unwrap();
        let html = module.render(&PageProps::default()).await.unwrap();
        assert_eq!(html, "<h1>hello</h1>");
        assert_eq!(module.static_paths().await.unwrap(), None);

        let err = loader.load(&Route::new("/x", "./src/Missing.jsx")).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_command_loader_missing_entry() {
        let dir = TempDir::new().unwrap();
        let loader = CommandLoader::new(vec!["node".into(), "ssr.mjs".into()], dir.path());
        let err = loader
            .load(&Route::new("/", "./src/Home.jsx"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err.downcast_ref::<LoaderError>(), Some(LoaderError::NotFound(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_loader_protocol() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/Post.jsx"), "").unwrap();

        // fake runtime: answers each action with canned JSON, echoes render input
        let script = r#"
case "$1" in
  paths) echo '{"paths":[{"params":{"slug":"a"}}]}' ;;
  props) echo 'null' ;;
  render) printf '"%s"' "$(cat | tr -d '"')" ;;
esac
"#;
        std::fs::write(dir.path().join("ssr.sh"), script).unwrap();

        let loader = CommandLoader::new(vec!["sh".into(), "ssr.sh".into()], dir.path());
        let module = loader
            .load(&Route::new("/blog/:slug", "./src/Post.jsx"))
            .await
            .unwrap();

        let paths = module.static_paths().await.unwrap().unwrap();
        assert_eq!(paths.paths.len(), 1);
        assert_eq!(paths.paths[0].params["slug"].to_path(), "a");

        assert_eq!(module.static_props(&Params::new()).await.unwrap(), None);

        let html = module.render(&PageProps::default()).await.unwrap();
        assert_eq!(html, "{params:{},props:null}");
    }
}
