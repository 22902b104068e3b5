//! External command execution.
//!
//! Builder API over `tokio::process`, used to drive the SSR runtime.
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! let output = Cmd::from_slice(&["node", "ssr.mjs"])
//!     .args(["render", "src/pages/Home.jsx"])
//!     .cwd(root)
//!     .stdin(props_json)
//!     .run()
//!     .await?;
//! ```

use std::ffi::{OsStr, OsString};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Failure to run a command, or a command that exited unsuccessfully.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("no command configured")]
    Empty,

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}{}", stderr_suffix(.stderr))]
    Failed { program: String, status: String, stderr: String },
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{stderr}")
    }
}

/// Command builder for external process execution.
#[derive(Debug, Default, Clone)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    stdin_data: Option<Vec<u8>>,
}

impl Cmd {
    /// Create from a command array (e.g., `["node", "ssr.mjs"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        Self {
            program,
            args: iter.map(|s| s.as_ref().to_owned()).collect(),
            ..Default::default()
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Pipe `data` to the process's stdin.
    pub fn stdin<D: AsRef<[u8]>>(mut self, data: D) -> Self {
        self.stdin_data = Some(data.as_ref().to_vec());
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Run to completion, capturing stdout and stderr.
    ///
    /// A non-zero exit status is an error carrying the process's stderr.
    pub async fn run(self) -> Result<Output, ExecError> {
        if self.program.is_empty() {
            return Err(ExecError::Empty);
        }

        let program = self.program_name();
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(if self.stdin_data.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let spawn_err = |source| ExecError::Spawn {
            program: program.clone(),
            source,
        };

        let mut child = cmd.spawn().map_err(spawn_err)?;

        // stdin is fed while output is collected
        let stdin = child.stdin.take();
        let data = self.stdin_data;
        let feed = async move {
            let (Some(mut stdin), Some(data)) = (stdin, data) else {
                return Ok(());
            };
            match stdin.write_all(&data).await {
                // the child exited without reading everything; its status says why
                Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
            // stdin dropped here: the child sees EOF
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(spawn_err)?;

        if !output.status.success() {
            return Err(ExecError::Failed {
                program: program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        fed.map_err(spawn_err)?;

        Ok(output)
    }
}
