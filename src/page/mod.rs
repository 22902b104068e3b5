//! Page modules: loading, build-time hooks, and static path expansion.
//!
//! # Module Structure
//!
//! ```text
//! page/
//! ├── module     # PageModule trait (render + optional hooks)
//! ├── loader     # ModuleLoader trait, MemoryLoader, CommandLoader
//! ├── hook       # guard(): catch/log/skip for build-time hooks
//! ├── expand     # StaticPathExpander
//! └── mod.rs     # StaticPaths, PageProps (this file)
//! ```

pub mod expand;
pub mod hook;
pub mod loader;
pub mod module;

pub use expand::{ExpandedPath, expand};
pub use hook::{Hook, HookKind, guard};
pub use loader::{CommandLoader, LoaderError, MemoryLoader, ModuleLoader};
pub use module::PageModule;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::route::Params;

/// One concrete instantiation of a dynamic route.
///
/// Only a single parameter per descriptor is substituted into the route
/// template: the one whose name appears as a placeholder in the route, or
/// the first one if none does. Other entries are still passed to the page
/// as params.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticPathDescriptor {
    pub params: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Value>,
}

/// Result of a page's path-enumeration hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticPaths {
    #[serde(default)]
    pub paths: Vec<StaticPathDescriptor>,
    /// Accepted for compatibility; every page is pre-rendered regardless.
    #[serde(default)]
    pub fallback: bool,
}

/// Props handed to a page render and embedded as `window.__INITIAL_PROPS__`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageProps {
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub props: Value,
}

impl PageProps {
    pub fn new(params: Params, props: Option<Value>) -> Self {
        Self {
            params,
            props: props.unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::ParamValue;

    #[test]
    fn test_static_paths_json() {
        let paths: StaticPaths = serde_json::from_str(
            r#"{ "paths": [
                { "params": { "id": "1" } },
                { "params": { "path": ["a", "b"] }, "props": { "title": "B" } }
            ] }"#,
        )
        .unwrap();

        assert_eq!(paths.paths.len(), 2);
        assert!(!paths.fallback);
        assert_eq!(paths.paths[0].params["id"], ParamValue::from("1"));
        assert_eq!(paths.paths[1].params["path"].to_path(), "a/b");
        assert_eq!(paths.paths[1].props.as_ref().unwrap()["title"], "B");
    }

    #[test]
    fn test_page_props_shape() {
        let props = PageProps::new(Params::new(), None);
        assert_eq!(
            serde_json::to_string(&props).unwrap(),
            r#"{"params":{},"props":null}"#
        );
    }
}
