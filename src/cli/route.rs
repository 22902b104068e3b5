//! `tessera match`: show which route a URL path resolves to.

use anyhow::Result;
use std::fmt::Write;

use crate::config::SiteConfig;
use crate::log;
use crate::route::{RouteMatch, RouteMatcher, RouteTable};

pub fn run(config: &SiteConfig, path: &str) -> Result<()> {
    let table = RouteTable::load(&config.build.routes)?;
    let matcher = RouteMatcher::new();

    match matcher.match_path(path, table.routes()) {
        Some(found) => log!("match"; "{}", describe(&found)),
        None => log!("match"; "no route matches `{}`", path),
    }
    Ok(())
}

fn describe(found: &RouteMatch<'_>) -> String {
    let mut out = format!("{} -> {}", found.route.path, found.route.entry);
    for (name, value) in &found.params {
        let _ = write!(out, "\n  {name} = {}", value.to_path());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Route;

    #[test]
    fn test_describe() {
        let routes = [Route::new("/docs/[...path]", "./src/Docs.jsx")];
        let found = RouteMatcher::new().match_path("/docs/a/b", &routes).unwrap();
        assert_eq!(describe(&found), "/docs/[...path] -> ./src/Docs.jsx\n  path = a/b");
    }
}
