//! git process invocation.
//!
//! `GitRunner` is the seam between the blame extractor and the `git` binary.
//! `SystemGit` spawns a real process per call; there is no timeout, so a hung
//! git hangs the caller's pipeline.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::BlameError;

#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run git with `args` in `cwd` and return its stdout.
    async fn run(&self, cwd: &Path, args: &[&OsStr]) -> Result<String, BlameError>;
}

#[derive(Debug, Clone)]
pub struct SystemGit {
    binary: PathBuf,
}

impl SystemGit {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new("git")
    }
}

#[async_trait]
impl GitRunner for SystemGit {
    async fn run(&self, cwd: &Path, args: &[&OsStr]) -> Result<String, BlameError> {
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| BlameError::Spawn {
                command: describe(args),
                source,
            })?;

        if !output.status.success() {
            return Err(BlameError::CommandFailed {
                command: describe(args),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

pub(crate) fn describe(args: &[&OsStr]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
