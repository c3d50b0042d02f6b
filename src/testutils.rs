//! Test utilities: scripted git output and porcelain fixtures.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::BlameError;
use crate::git::runner::{describe, GitRunner};

pub const HASH_A: &str = "3f786850e387550fdab836ed7e6dc881de23001b";
pub const HASH_B: &str = "89e6c98d92887913cadf06b2adb97f26cde4849b";

/// One `--line-porcelain` record as git prints it.
pub fn porcelain_record(hash: &str, orig_line: u32, final_line: u32, author_time: i64, content: &str) -> String {
    format!(
        "{hash} {orig_line} {final_line} 1\n\
         author Test Author\n\
         author-mail <test@example.com>\n\
         author-time {author_time}\n\
         author-tz +0000\n\
         committer Test Author\n\
         committer-mail <test@example.com>\n\
         committer-time {author_time}\n\
         committer-tz +0000\n\
         summary fixture commit\n\
         filename src/lib.rs\n\
         \t{content}\n"
    )
}

#[derive(Debug, Clone)]
enum Reply {
    Stdout(String),
    Fail,
}

/// `GitRunner` answering `rev-parse` and `blame` from canned replies.
#[derive(Debug)]
pub struct ScriptedGit {
    root: Reply,
    blame: Reply,
    calls: Mutex<Vec<(PathBuf, String)>>,
}

impl ScriptedGit {
    pub fn new() -> Self {
        Self {
            root: Reply::Fail,
            blame: Reply::Fail,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_root(mut self, stdout: &str) -> Self {
        self.root = Reply::Stdout(stdout.to_string());
        self
    }

    pub fn with_blame(mut self, stdout: &str) -> Self {
        self.blame = Reply::Stdout(stdout.to_string());
        self
    }

    pub fn failing_blame(mut self) -> Self {
        self.blame = Reply::Fail;
        self
    }

    /// (working directory, argument line) of every invocation so far.
    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GitRunner for ScriptedGit {
    async fn run(&self, cwd: &Path, args: &[&OsStr]) -> Result<String, BlameError> {
        let command = describe(args);
        self.calls.lock().unwrap().push((cwd.to_path_buf(), command.clone()));

        let reply = match args.first().and_then(|a| a.to_str()) {
            Some("rev-parse") => Some(&self.root),
            Some("blame") => Some(&self.blame),
            _ => None,
        };
        match reply {
            Some(Reply::Stdout(stdout)) => Ok(stdout.clone()),
            _ => Err(BlameError::Spawn {
                command,
                source: io::Error::other("scripted failure"),
            }),
        }
    }
}
