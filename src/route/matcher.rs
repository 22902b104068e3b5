//! Best-match route resolution with specificity scoring.
//!
//! Every route is tried against the normalized path and the highest-scoring
//! match wins:
//!
//! | Match kind                         | Score |
//! |------------------------------------|-------|
//! | exact string equality              | 100   |
//! | named / bracket parameter          | 50    |
//! | wildcard / catch-all               | 10    |
//!
//! Ties go to the route declared first.

use super::pattern::{CompiledPattern, PatternCache, Segment};
use super::{ParamValue, Params, Route, RouteMatch};
use crate::utils::url::{segments, trim_trailing_slash};

const SCORE_EXACT: u32 = 100;
const SCORE_PARAM: u32 = 50;
const SCORE_WILDCARD: u32 = 10;

/// Resolves request paths against an ordered route list.
///
/// Owns the [`PatternCache`] of compiled dynamic patterns.
#[derive(Debug, Default)]
pub struct RouteMatcher {
    cache: PatternCache,
}

impl RouteMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Find the best route for `path`, or `None` when nothing matches.
    pub fn match_path<'r>(&self, path: &str, routes: &'r [Route]) -> Option<RouteMatch<'r>> {
        let path = trim_trailing_slash(path);
        let mut best: Option<(u32, RouteMatch<'r>)> = None;

        for route in routes {
            let Some((score, params)) = self.try_route(path, route) else {
                continue;
            };
            // Strictly greater: an earlier route keeps its place on a tie.
            if best.as_ref().is_none_or(|(top, _)| score > *top) {
                best = Some((score, RouteMatch { route, params }));
            }
        }

        best.map(|(_, m)| m)
    }

    /// Attempt a single route; returns its score and captured params.
    fn try_route(&self, path: &str, route: &Route) -> Option<(u32, Params)> {
        let pattern = trim_trailing_slash(&route.path);
        if pattern == path {
            return Some((SCORE_EXACT, Params::new()));
        }
        if !route.is_dynamic() {
            return None;
        }

        let compiled = self.cache.get_or_compile(pattern);
        let params = if compiled.has_brackets() {
            match_segments(&compiled, path)?
        } else {
            compiled.captures(path)?
        };
        Some((score(&compiled), params))
    }
}

/// Specificity score for a non-exact match.
fn score(pattern: &CompiledPattern) -> u32 {
    let raw = pattern.raw();
    let has_param = raw.contains(':')
        || pattern
            .segments()
            .iter()
            .any(|s| matches!(s, Segment::Param(_)));

    if has_param {
        SCORE_PARAM
    } else if raw.contains('*') || pattern.catch_all().is_some() {
        SCORE_WILDCARD
    } else {
        0
    }
}

/// Segment-wise matching for bracket patterns.
fn match_segments(pattern: &CompiledPattern, path: &str) -> Option<Params> {
    let path_segments: Vec<&str> = segments(path).collect();
    let route_segments = pattern.segments();

    if let Some((index, name)) = pattern.catch_all() {
        // Everything after the catch-all in the pattern is ignored.
        let before = &route_segments[..index];
        let path_before = path_segments.get(..index)?;
        let mut params = match_positional(before, path_before)?;
        let rest = path_segments[index..].iter().map(|s| (*s).to_owned()).collect();
        params.insert(name.to_owned(), ParamValue::Many(rest));
        return Some(params);
    }

    if route_segments.len() != path_segments.len() {
        return None;
    }
    match_positional(route_segments, &path_segments)
}

/// Match equal-length segment lists, capturing dynamic segments.
fn match_positional(route_segments: &[Segment], path_segments: &[&str]) -> Option<Params> {
    debug_assert_eq!(route_segments.len(), path_segments.len());
    let mut params = Params::new();

    for (seg, actual) in route_segments.iter().zip(path_segments) {
        match seg {
            Segment::Static(expected) if expected != actual => return None,
            Segment::Static(_) | Segment::CatchAll(_) => {}
            Segment::Param(name) => {
                params.insert(name.clone(), ParamValue::from(*actual));
            }
        }
    }

    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes(paths: &[&str]) -> Vec<Route> {
        paths
            .iter()
            .enumerate()
            .map(|(i, p)| Route::new(*p, format!("./src/pages/P{i}.jsx")))
            .collect()
    }

    #[test]
    fn test_static_route_matches_only_by_equality() {
        let table = routes(&["/", "/about", "/blog"]);
        let matcher = RouteMatcher::new();

        assert_eq!(matcher.match_path("/about", &table).unwrap().route.path, "/about");
        assert_eq!(matcher.match_path("/about/", &table).unwrap().route.path, "/about");
        assert_eq!(matcher.match_path("/", &table).unwrap().route.path, "/");
        assert!(matcher.match_path("/about/team", &table).is_none());
        assert!(matcher.match_path("/abou", &table).is_none());
    }

    #[test]
    fn test_named_param() {
        let table = routes(&["/blog/:slug"]);
        let m = RouteMatcher::new().match_path("/blog/hello-world", &table).unwrap();
        assert_eq!(m.route.path, "/blog/:slug");
        assert_eq!(m.params["slug"], ParamValue::from("hello-world"));
    }

    #[test]
    fn test_bracket_param() {
        let table = routes(&["/users/[id]/settings"]);
        let matcher = RouteMatcher::new();

        let m = matcher.match_path("/users/7/settings", &table).unwrap();
        assert_eq!(m.params["id"], ParamValue::from("7"));
        assert!(matcher.match_path("/users/7", &table).is_none());
        assert!(matcher.match_path("/users/7/profile", &table).is_none());
    }

    #[test]
    fn test_catch_all() {
        let table = routes(&["/docs/[...path]"]);
        let matcher = RouteMatcher::new();

        let m = matcher.match_path("/docs/a/b/c", &table).unwrap();
        assert_eq!(
            m.params["path"],
            ParamValue::Many(vec!["a".into(), "b".into(), "c".into()])
        );

        let empty = matcher.match_path("/docs", &table).unwrap();
        assert_eq!(empty.params["path"], ParamValue::Many(vec![]));

        assert!(matcher.match_path("/guide/a", &table).is_none());
    }

    #[test]
    fn test_catch_all_with_leading_param() {
        let table = routes(&["/[lang]/docs/[...path]"]);
        let m = RouteMatcher::new().match_path("/en/docs/intro/setup", &table).unwrap();
        assert_eq!(m.params["lang"], ParamValue::from("en"));
        assert_eq!(
            m.params["path"],
            ParamValue::Many(vec!["intro".into(), "setup".into()])
        );
    }

    #[test]
    fn test_segments_after_catch_all_ignored() {
        let table = routes(&["/docs/[...path]/edit"]);
        let matcher = RouteMatcher::new();

        let m = matcher.match_path("/docs/a/b", &table).unwrap();
        assert_eq!(m.params["path"], ParamValue::Many(vec!["a".into(), "b".into()]));

        // a trailing literal is captured, not required
        let m = matcher.match_path("/docs/a/edit", &table).unwrap();
        assert_eq!(
            m.params["path"],
            ParamValue::Many(vec!["a".into(), "edit".into()])
        );
    }

    #[test]
    fn test_static_beats_dynamic() {
        let table = routes(&["/:page", "/about"]);
        let m = RouteMatcher::new().match_path("/about", &table).unwrap();
        assert_eq!(m.route.path, "/about");
        assert!(m.params.is_empty());
    }

    #[test]
    fn test_param_beats_wildcard() {
        let table = routes(&["/files/*", "/files/:name"]);
        let m = RouteMatcher::new().match_path("/files/readme", &table).unwrap();
        assert_eq!(m.route.path, "/files/:name");

        let deep = RouteMatcher::new().match_path("/files/a/b", &table).unwrap();
        assert_eq!(deep.route.path, "/files/*");
    }

    #[test]
    fn test_earlier_route_wins_tie() {
        let table = routes(&["/:first", "/[second]"]);
        let m = RouteMatcher::new().match_path("/x", &table).unwrap();
        assert_eq!(m.route.path, "/:first");
        assert_eq!(m.params["first"], ParamValue::from("x"));
    }

    #[test]
    fn test_no_match_returns_none() {
        let table = routes(&["/", "/blog/:slug"]);
        assert!(RouteMatcher::new().match_path("/blog/a/b", &table).is_none());
        assert!(RouteMatcher::new().match_path("/x", &[]).is_none());
    }

    #[test]
    fn test_matcher_populates_cache_once() {
        let table = routes(&["/blog/:slug", "/about"]);
        let matcher = RouteMatcher::new();
        matcher.match_path("/blog/a", &table);
        matcher.match_path("/blog/b", &table);
        // static routes never reach the cache
        assert_eq!(matcher.cache().len(), 1);
    }
}
