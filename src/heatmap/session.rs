//! Per-editor decoration state.
//!
//! A session owns the decorations currently installed in one editor. Each
//! pipeline run takes a `SequenceToken` before extraction starts and presents
//! it when committing. A commit disposes everything previously installed and
//! installs the new batches in one step, and only if its token is newer than
//! the last committed one, so a slow run can't overwrite a faster, later one.
//!
//! Tokens come from one `Sequencer` shared by every session of a service. A
//! session remembers the last token issued before it was opened and rejects
//! anything at or below it, so a run begun against a closed session can't
//! land in a new session reopened under the same id.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{Decoration, OpacityBatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SequenceToken(u64);

impl SequenceToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Sequencer {
    last: AtomicU64,
}

impl Sequencer {
    pub fn next(&self) -> SequenceToken {
        SequenceToken(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Most recently issued token; `SequenceToken(0)` before any.
    pub fn last(&self) -> SequenceToken {
        SequenceToken(self.last.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Applied {
        dispose: Vec<u64>,
        install: Vec<Decoration>,
    },
    Stale,
}

#[derive(Debug, Default)]
pub struct EditorSession {
    /// Tokens at or below this are stale.
    floor: u64,
    committed: u64,
    next_decoration_id: u64,
    applied: Vec<Decoration>,
}

impl EditorSession {
    /// A session that only accepts tokens issued after `last_issued`.
    pub fn opened_after(last_issued: SequenceToken) -> Self {
        Self {
            floor: last_issued.0,
            ..Self::default()
        }
    }

    pub fn commit(&mut self, token: SequenceToken, batches: Vec<OpacityBatch>) -> Commit {
        if token.0 <= self.floor {
            return Commit::Stale;
        }
        self.floor = token.0;
        self.committed = token.0;

        let dispose = self.dispose_all();
        let install: Vec<Decoration> = batches
            .into_iter()
            .map(|batch| {
                self.next_decoration_id += 1;
                Decoration {
                    id: self.next_decoration_id,
                    opacity: batch.opacity,
                    ranges: batch.ranges,
                }
            })
            .collect();
        self.applied = install.clone();

        Commit::Applied { dispose, install }
    }

    pub fn applied(&self) -> &[Decoration] {
        &self.applied
    }

    /// Token value of the last successful commit, 0 before any.
    pub fn last_committed(&self) -> u64 {
        self.committed
    }

    /// Forget every installed decoration and return their ids.
    pub fn dispose_all(&mut self) -> Vec<u64> {
        self.applied.drain(..).map(|d| d.id).collect()
    }
}
