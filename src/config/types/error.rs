//! Configuration errors and collected validation diagnostics.
//!
//! Validation never stops at the first problem: every section reports into a
//! shared [`ConfigDiagnostics`], which turns into a single error listing all
//! of them.
//!
//! ```text
//! config validation failed:
//!   build.output_roots  `dist` does not end with `/`  (use "dist/")
//!   ssr.command         no SSR command configured
//! ```

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid TOML")]
    Toml(#[from] toml::de::Error),

    // no #[from]: source() would print the diagnostics twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One problem, attached to the field that caused it.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl ConfigDiagnostic {
    fn new(field: FieldPath, message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            field,
            message: message.into(),
            hint,
        }
    }
}

/// Errors and warnings collected across all sections.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
    warnings: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.errors.push(ConfigDiagnostic::new(field, message, None));
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        let hint = Some(hint.into());
        self.errors.push(ConfigDiagnostic::new(field, message, hint));
    }

    /// Non-fatal problem, logged by [`Self::print_warnings`].
    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.warnings.push(ConfigDiagnostic::new(field, message, None));
    }

    pub fn print_warnings(&self) {
        for warning in &self.warnings {
            crate::log!("warning"; "{}: {}", warning.field.as_str(), warning.message);
        }
    }

    /// Number of errors (warnings are not counted).
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ConfigDiagnostic] {
        &self.warnings
    }

    /// `Err(self)` when any error was recorded.
    pub fn into_result(mut self) -> Result<(), Self> {
        if self.errors.is_empty() {
            return Ok(());
        }
        self.errors.sort_by_key(|d| d.field.as_str());
        Err(self)
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .errors
            .iter()
            .map(|d| d.field.as_str().len())
            .max()
            .unwrap_or(0);

        write!(f, "{}", "config validation failed:".red().bold())?;
        for diag in &self.errors {
            let field = format!("{:width$}", diag.field.as_str());
            write!(f, "\n  {}  {}", field.cyan(), diag.message)?;
            if let Some(hint) = &diag.hint {
                write!(f, "  {}", format_args!("({hint})").dimmed())?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
