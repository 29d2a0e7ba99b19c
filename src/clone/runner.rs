//! Running the external clone command.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::debug;
use wait_timeout::ChildExt;

use crate::config::ClonerConfig;
use crate::error::{Result, StarError};

/// How a single clone attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    /// The command exited successfully.
    Success,
    /// The command exited unsuccessfully; carries its trimmed stderr.
    ExitFailure { stderr: String },
    /// The deadline passed and the command was killed.
    TimedOut,
}

impl CloneOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CloneOutcome::Success)
    }
}

/// Something that can clone a repository URL.
///
/// `Err` means the command could not be run at all (e.g. not installed).
pub trait CloneRunner {
    fn clone_repo(&self, url: &str) -> Result<CloneOutcome>;
}

/// Clones by shelling out to `git clone <url>`.
#[derive(Debug, Clone)]
pub struct GitCloner {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    current_dir: Option<PathBuf>,
}

impl GitCloner {
    /// `git clone` with the default 300 second deadline.
    pub fn new() -> Self {
        Self::from_config(&ClonerConfig::default())
    }

    pub fn from_config(config: &ClonerConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: vec!["clone".into()],
            timeout: config.timeout,
            current_dir: None,
        }
    }

    /// Run `program args... <url>` instead of `git clone <url>`.
    pub fn with_command(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            ..Self::new()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Clone into `dir` rather than the process working directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }
}

impl Default for GitCloner {
    fn default() -> Self {
        Self::new()
    }
}

impl CloneRunner for GitCloner {
    fn clone_repo(&self, url: &str) -> Result<CloneOutcome> {
        let invocation_error = |e: std::io::Error| StarError::CloneInvocation {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        debug!(program = %self.program, url, "spawning clone");
        let mut child = cmd.spawn().map_err(invocation_error)?;

        // Drain stderr while the child runs so a chatty clone can't fill the pipe.
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf);
                buf
            })
        });

        let status = match child.wait_timeout(self.timeout).map_err(invocation_error)? {
            Some(status) => status,
            None => {
                debug!(url, timeout_secs = self.timeout.as_secs(), "clone timed out, killing");
                child.kill().map_err(invocation_error)?;
                child.wait().map_err(invocation_error)?;
                // The reader is left detached: helpers spawned by git may still hold the pipe.
                return Ok(CloneOutcome::TimedOut);
            }
        };

        if status.success() {
            return Ok(CloneOutcome::Success);
        }

        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .map(|buf| String::from_utf8_lossy(&buf).trim().to_string())
            .unwrap_or_default();
        Ok(CloneOutcome::ExitFailure { stderr })
    }
}
