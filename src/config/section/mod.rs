//! Configuration section definitions.
//!
//! | Module  | TOML Section | Purpose                                |
//! |---------|--------------|----------------------------------------|
//! | `build` | `[build]`    | Routes, metafile, manifest, output     |
//! | `site`  | `[site]`     | Site name, url, SEO defaults           |
//! | `ssr`   | `[ssr]`      | External page runtime command          |

mod build;
mod site;
mod ssr;

pub use build::{BuildSectionConfig, RobotsConfig, SitemapConfig};
pub use site::{SeoConfig, SiteSectionConfig};
pub use ssr::SsrConfig;
