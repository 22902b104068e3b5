//! Page document assembly and output.
//!
//! ```text
//! render/
//! ├── tags       # <link>/<script> tags from the manifest
//! ├── document   # full HTML document around the rendered body
//! └── emit       # Emitter trait + FsEmitter (index.html per route)
//! ```

pub mod document;
pub mod emit;
pub mod tags;

pub use document::Document;
pub use emit::{Emitter, FsEmitter};
pub use tags::{ExtraAssets, asset_tags};
