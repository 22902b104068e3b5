//! Auxiliary files generated after all pages are emitted.
//!
//! - **Sitemap**: search engine indexing (`sitemap.xml`)
//! - **Robots**: crawler rules (`robots.txt`)
//!
//! Both work from the list of URL paths the build emitted, so no output
//! directory scan is needed.

pub mod robots;
pub mod sitemap;

pub use robots::build_robots;
pub use sitemap::build_sitemap;
