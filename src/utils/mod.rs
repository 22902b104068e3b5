//! Shared helpers: content hashing, HTML escaping, URL paths, subprocesses.

pub mod exec;
pub mod hash;
pub mod html;
pub mod url;
