//! Static path expansion: one dynamic route -> N concrete output paths.
//!
//! Placeholders are found the same way the pattern compiler finds them:
//!
//! | Placeholder   | Where                      | Example                 |
//! |---------------|----------------------------|-------------------------|
//! | `:name`       | anywhere in a segment      | `/blog/post-:id`        |
//! | `[name]`      | a whole segment            | `/users/[id]`           |
//! | `[...name]`   | a whole segment            | `/docs/[...path]`       |
//! | `*`           | anywhere (unnamed)         | `/files/*`              |
//!
//! Exactly one placeholder is filled per descriptor; every other character of
//! the route is kept as written.

use serde_json::Value;

use super::StaticPathDescriptor;
use crate::debug;
use crate::route::pattern::param_ident;
use crate::route::{ParamValue, Params, Route};
use crate::utils::url::collapse_slashes;

/// A concrete page produced from a dynamic route.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedPath {
    /// Normalized URL path (`/blog/hello`), no trailing slash except the root.
    pub output_path: String,
    pub params: Params,
    pub props: Option<Value>,
}

/// Expand `route` into one output path per descriptor.
///
/// Descriptors without params are skipped.
pub fn expand(route: &Route, descriptors: &[StaticPathDescriptor]) -> Vec<ExpandedPath> {
    let slots = placeholders(&route.path);

    descriptors
        .iter()
        .filter_map(|descriptor| {
            let Some((name, value)) = pick_param(&slots, &descriptor.params) else {
                debug!("expand"; "`{}`: descriptor without params skipped", route.path);
                return None;
            };

            Some(ExpandedPath {
                output_path: substitute(&route.path, &slots, name, value),
                params: descriptor.params.clone(),
                props: descriptor.props.clone(),
            })
        })
        .collect()
}

/// A placeholder's byte span in the route pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot<'a> {
    start: usize,
    end: usize,
    /// `None` for the `*` wildcard.
    name: Option<&'a str>,
}

/// Every placeholder in `pattern`, in order of appearance.
fn placeholders(pattern: &str) -> Vec<Slot<'_>> {
    let mut slots = Vec::new();
    let mut offset = 0;

    for seg in pattern.split('/') {
        let seg_start = offset;
        offset += seg.len() + 1;

        if seg.len() >= 2 && seg.starts_with('[') && seg.ends_with(']') {
            let inner = &seg[1..seg.len() - 1];
            slots.push(Slot {
                start: seg_start,
                end: seg_start + seg.len(),
                name: Some(inner.strip_prefix("...").unwrap_or(inner)),
            });
            continue;
        }

        let mut i = 0;
        while let Some(c) = seg[i..].chars().next() {
            match c {
                ':' => {
                    if let Some(name) = param_ident(&seg[i + 1..]) {
                        let end = i + 1 + name.len();
                        slots.push(Slot {
                            start: seg_start + i,
                            end: seg_start + end,
                            name: Some(name),
                        });
                        i = end;
                        continue;
                    }
                }
                '*' => slots.push(Slot {
                    start: seg_start + i,
                    end: seg_start + i + 1,
                    name: None,
                }),
                _ => {}
            }
            i += c.len_utf8();
        }
    }

    slots
}

/// The param naming a placeholder in the template, else the first one.
fn pick_param<'p>(slots: &[Slot<'_>], params: &'p Params) -> Option<(&'p str, &'p ParamValue)> {
    params
        .iter()
        .find(|(name, _)| slots.iter().any(|s| s.name == Some(name.as_str())))
        .or_else(|| params.iter().next())
        .map(|(name, value)| (name.as_str(), value))
}

fn substitute(pattern: &str, slots: &[Slot<'_>], name: &str, value: &ParamValue) -> String {
    // a param that names no placeholder fills the first one
    let target = slots
        .iter()
        .find(|s| s.name == Some(name))
        .or_else(|| slots.first());

    let path = match target {
        Some(slot) => format!(
            "{}{}{}",
            &pattern[..slot.start],
            value.to_path(),
            &pattern[slot.end..]
        ),
        None => pattern.to_owned(),
    };

    if path.is_empty() {
        return "/".to_owned();
    }
    collapse_slashes(&path).into_owned()
}
