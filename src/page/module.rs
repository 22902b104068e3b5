//! The page module contract.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::{PageProps, StaticPaths};
use crate::route::Params;

/// A loaded page: a render function plus optional build-time hooks.
///
/// Hooks a module does not export return `Ok(None)`.
#[async_trait]
pub trait PageModule: Send + Sync {
    /// Enumerate concrete paths for a dynamic route.
    async fn static_paths(&self) -> Result<Option<StaticPaths>> {
        Ok(None)
    }

    /// Fetch build-time props for one set of params.
    async fn static_props(&self, _params: &Params) -> Result<Option<Value>> {
        Ok(None)
    }

    /// Render the page body to an HTML string.
    async fn render(&self, props: &PageProps) -> Result<String>;
}
