//! Per-line commit times from `git blame --line-porcelain`.
//!
//! Every record in the porcelain stream opens with a header line
//! (`<hash> <orig-line> <final-line> [<group-size>]`) followed by metadata
//! lines and finally the tab-prefixed line content. Only the final line number
//! and `author-time` are kept.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::BlameError;
use crate::git::runner::{GitRunner, SystemGit};

/// Record header. SHA-256 repositories emit 64-char hashes.
static RECORD_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9a-f]{64}|[0-9a-f]{40}) (\d+)(?: (\d+))?").expect("record header regex")
});

const AUTHOR_TIME: &str = "author-time ";

/// Last-modified time (Unix seconds) keyed by zero-based line index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTimestamps(BTreeMap<u32, i64>);

impl LineTimestamps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later inserts for the same line replace earlier ones.
    pub fn insert(&mut self, line: u32, timestamp: i64) {
        self.0.insert(line, timestamp);
    }

    #[cfg(test)]
    pub fn get(&self, line: u32) -> Option<i64> {
        self.0.get(&line).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending line order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, i64)> + '_ {
        self.0.iter().map(|(&line, &timestamp)| (line, timestamp))
    }
}

impl FromIterator<(u32, i64)> for LineTimestamps {
    fn from_iter<I: IntoIterator<Item = (u32, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Record being accumulated while scanning the stream.
#[derive(Debug, Default)]
struct PendingRecord {
    /// 1-based line in the working file.
    line: Option<u32>,
    /// 0 until an `author-time` line is seen.
    timestamp: i64,
}

impl PendingRecord {
    fn flush_into(&self, out: &mut LineTimestamps) {
        // A zero timestamp is "unset", so an epoch-zero commit is dropped too.
        if self.timestamp == 0 {
            return;
        }
        if let Some(index) = self.line.and_then(|line| line.checked_sub(1)) {
            out.insert(index, self.timestamp);
        }
    }
}

pub fn parse_line_porcelain(stdout: &str) -> LineTimestamps {
    let mut times = LineTimestamps::new();
    let mut pending = PendingRecord::default();

    for line in stdout.lines() {
        if let Some(caps) = RECORD_START.captures(line) {
            pending.flush_into(&mut times);
            let final_line = caps
                .get(2)
                .or_else(|| caps.get(1))
                .and_then(|m| m.as_str().parse().ok());
            pending = PendingRecord {
                line: final_line,
                timestamp: 0,
            };
            continue;
        }

        if let Some(rest) = line.strip_prefix(AUTHOR_TIME) {
            pending.timestamp = rest
                .split_whitespace()
                .next()
                .and_then(|t| t.parse().ok())
                .unwrap_or(0);
        }
    }
    pending.flush_into(&mut times);

    times
}

/// Runs the two git queries behind a heatmap: root resolution, then blame.
#[derive(Debug, Clone, Default)]
pub struct BlameExtractor<R = SystemGit> {
    runner: R,
}

impl<R: GitRunner> BlameExtractor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub async fn repository_root(&self, file: &Path) -> Result<PathBuf, BlameError> {
        let cwd = working_dir(file)?;
        let args = [OsStr::new("rev-parse"), OsStr::new("--show-toplevel")];

        let stdout = match self.runner.run(cwd, &args).await {
            Ok(stdout) => stdout,
            Err(BlameError::CommandFailed { stderr, .. }) => {
                return Err(BlameError::NotInRepository {
                    path: file.to_path_buf(),
                    reason: stderr,
                });
            }
            Err(e) => return Err(e),
        };

        let root = stdout.trim();
        if root.is_empty() {
            return Err(BlameError::NotInRepository {
                path: file.to_path_buf(),
                reason: "git reported no top-level directory".to_string(),
            });
        }
        Ok(PathBuf::from(root))
    }

    /// Commit time of every attributable line of `file`.
    ///
    /// Both git calls run with the file's directory as working directory and
    /// are repeated on every call. Any failure, including an empty result,
    /// comes back as an error; there are no partial results.
    pub async fn line_commit_times(&self, file: &Path) -> Result<LineTimestamps, BlameError> {
        let root = self.repository_root(file).await?;

        let cwd = working_dir(file)?;
        let name = file
            .file_name()
            .ok_or_else(|| BlameError::InvalidPath(file.to_path_buf()))?;
        let args = [
            OsStr::new("blame"),
            OsStr::new("--line-porcelain"),
            OsStr::new("--"),
            name,
        ];
        let stdout = self.runner.run(cwd, &args).await?;

        let times = parse_line_porcelain(&stdout);
        if times.is_empty() {
            return Err(BlameError::NoAttribution(file.to_path_buf()));
        }

        tracing::debug!(
            "Blamed {} lines of {} (repository {})",
            times.len(),
            file.display(),
            root.display()
        );
        Ok(times)
    }
}

fn working_dir(file: &Path) -> Result<&Path, BlameError> {
    match file.parent() {
        Some(dir) if dir.as_os_str().is_empty() => Ok(Path::new(".")),
        Some(dir) => Ok(dir),
        None => Err(BlameError::InvalidPath(file.to_path_buf())),
    }
}
