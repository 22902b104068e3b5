//! Build-time hook invocation.
//!
//! Every optional page hook goes through [`guard`]: a failing hook is logged
//! and reported as [`Hook::Failed`] so the caller can skip the affected route
//! or page while the build continues.

use std::fmt;
use std::future::Future;

use anyhow::Result;

use crate::log;
use crate::route::Route;

/// Which hook is running, for log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    StaticPaths,
    StaticProps,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StaticPaths => "static paths",
            Self::StaticProps => "static props",
        })
    }
}

/// Outcome of a guarded hook call.
#[derive(Debug, Clone, PartialEq)]
pub enum Hook<T> {
    /// The module does not export this hook.
    Absent,
    Ready(T),
    /// The hook failed; the error has already been logged.
    Failed,
}

impl<T> Hook<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Value if ready, `None` for both absent and failed.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Absent | Self::Failed => None,
        }
    }
}

/// Await a hook, converting errors into a logged [`Hook::Failed`].
pub async fn guard<T, F>(kind: HookKind, route: &Route, hook: F) -> Hook<T>
where
    F: Future<Output = Result<Option<T>>>,
{
    match hook.await {
        Ok(Some(value)) => Hook::Ready(value),
        Ok(None) => Hook::Absent,
        Err(e) => {
            log!("error"; "{} failed for `{}` ({}): {:#}", kind, route.path, route.entry, e);
            Hook::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[tokio::test]
    async fn test_guard_outcomes() {
        let route = Route::new("/blog/:slug", "./src/Post.jsx");

        let ready = guard(HookKind::StaticPaths, &route, async { Ok(Some(3)) }).await;
        assert_eq!(ready, Hook::Ready(3));

        let absent: Hook<i32> = guard(HookKind::StaticPaths, &route, async { Ok(None) }).await;
        assert_eq!(absent, Hook::Absent);
        assert_eq!(absent.ready(), None);

        let failed: Hook<i32> =
            guard(HookKind::StaticProps, &route, async { Err(anyhow!("boom")) }).await;
        assert!(failed.is_failed());
    }
}
