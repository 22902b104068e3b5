//! `[ssr]` section: the external page runtime.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// `[ssr]` configuration.
///
/// ```toml
/// [ssr]
/// command = ["node", "ssr.mjs"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SsrConfig {
    /// Program and leading args; the action and entry are appended.
    pub command: Vec<String>,
}

impl SsrConfig {
    const COMMAND: FieldPath = FieldPath::new("ssr.command");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match self.command.first() {
            None => diag.error_with_hint(
                Self::COMMAND,
                "no SSR command configured",
                "set [ssr] command = [\"node\", \"ssr.mjs\"]",
            ),
            Some(program) if program.trim().is_empty() => {
                diag.error(Self::COMMAND, "program name is empty");
            }
            Some(_) => {}
        }
    }
}
