//! Fingerprinting for bundler output names.
//!
//! Bundlers embed a short hex hash in output filenames (`vendor-1a2b3c4d.js`).
//! The manifest needs that hash for bookkeeping; when a file carries none we
//! derive a stand-in from the path with `FxHasher`.
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let fp = hash::fingerprint("assets/logo.png"); // -> "a1b2c3d4"
//! assert_eq!(hash::embedded("vendor-1a2b3c4d.js"), Some("1a2b3c4d"));
//! ```

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Length of the hex hash bundlers append to output names.
pub const HASH_LEN: usize = 8;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

/// Compute hash and return as 8-char hex fingerprint.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    format!("{:016x}", compute(value))[..HASH_LEN].to_string()
}

/// Extract an embedded `-xxxxxxxx.` hash from a filename, if present.
pub fn embedded(file_name: &str) -> Option<&str> {
    let bytes = file_name.as_bytes();
    // Scan every `-` followed by exactly HASH_LEN lowercase hex digits and a dot.
    file_name.match_indices('-').find_map(|(pos, _)| {
        let start = pos + 1;
        let end = start + HASH_LEN;
        let candidate = file_name.get(start..end)?;
        let followed_by_dot = bytes.get(end) == Some(&b'.');
        (followed_by_dot && is_lower_hex(candidate)).then_some(candidate)
    })
}

/// Hash used to identify an output file: the embedded one, else a fingerprint.
pub fn file_hash(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    embedded(name).map_or_else(|| fingerprint(path), str::to_owned)
}

#[inline]
pub fn is_lower_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
