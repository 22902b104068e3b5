//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find the config file, searching upward from `start`.
///
/// An absolute `config_name` is returned as-is when it exists.
///
/// ```text
/// /home/user/site/src/pages/   ← start
/// /home/user/site/tessera.toml ← found
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}
