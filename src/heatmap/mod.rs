//! Blame-to-decoration pipeline.
//!
//! `Heatmap` runs extraction then mapping for one document. `HeatmapService`
//! wraps it with per-editor sessions for the daemon; `show` uses `Heatmap`
//! directly.

pub mod opacity;
pub mod service;
pub mod session;

use crate::error::Unavailable;
use crate::git::{BlameExtractor, GitRunner, SystemGit};
use crate::models::{DocumentRef, OpacityBatch};

pub use opacity::{opacity_batches, OpacityScale, MAX_OPACITY, MIN_OPACITY};
pub use service::{HeatmapService, SharedService};

/// Current time in Unix seconds.
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[derive(Debug, Clone)]
pub struct Heatmap<R = SystemGit> {
    extractor: BlameExtractor<R>,
    scale: OpacityScale,
}

impl<R: GitRunner> Heatmap<R> {
    pub fn new(runner: R, scale: OpacityScale) -> Self {
        Self {
            extractor: BlameExtractor::new(runner),
            scale,
        }
    }

    /// Opacity batches for `document` as of `now`.
    pub async fn batches_for(&self, document: &DocumentRef, now: i64) -> Result<Vec<OpacityBatch>, Unavailable> {
        if document.untitled {
            return Err(Unavailable::Untitled);
        }
        let lines = self.extractor.line_commit_times(&document.path).await?;
        Ok(opacity_batches(&lines, now, &self.scale))
    }

    /// Like `batches_for`, with any unavailable cause logged and turned into
    /// an empty result.
    pub async fn render(&self, document: &DocumentRef, now: i64) -> Vec<OpacityBatch> {
        match self.batches_for(document, now).await {
            Ok(batches) => batches,
            Err(cause) => {
                tracing::debug!("No heatmap for {}: {}", document.path.display(), cause);
                Vec::new()
            }
        }
    }
}
