//! Session registry behind the editor daemon.
//!
//! Sessions are created on their first event. The lock is only held to take
//! a sequence token and to commit; git runs without it, so events for other
//! sessions (and newer events for the same one) are never blocked by a slow
//! blame.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use crate::error::{AppError, Result};
use crate::git::{GitRunner, SystemGit};
use crate::heatmap::session::{Commit, EditorSession, Sequencer};
use crate::heatmap::Heatmap;
use crate::models::{EditorEvent, EventOutcome, OutcomeStatus, SessionClosed, SessionDecorations};

pub struct HeatmapService<R = SystemGit> {
    heatmap: Heatmap<R>,
    sequencer: Sequencer,
    sessions: RwLock<HashMap<String, EditorSession>>,
}

pub type SharedService<R = SystemGit> = Arc<HeatmapService<R>>;

impl<R: GitRunner> HeatmapService<R> {
    pub fn new(heatmap: Heatmap<R>) -> Self {
        Self {
            heatmap,
            sequencer: Sequencer::default(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn handle_event(&self, session: &str, event: &EditorEvent) -> Result<EventOutcome> {
        self.handle_event_at(session, event, super::now()).await
    }

    pub async fn handle_event_at(&self, session: &str, event: &EditorEvent, now: i64) -> Result<EventOutcome> {
        let Some(document) = event.target() else {
            return Ok(EventOutcome::ignored(session));
        };

        let token = {
            let mut sessions = self.write()?;
            let last_issued = self.sequencer.last();
            sessions
                .entry(session.to_string())
                .or_insert_with(|| EditorSession::opened_after(last_issued));
            self.sequencer.next()
        };
        let batches = self.heatmap.render(document, now).await;

        let mut sessions = self.write()?;
        // Closed while blame was running.
        let Some(state) = sessions.get_mut(session) else {
            return Ok(EventOutcome::stale(session, token.value()));
        };

        match state.commit(token, batches) {
            Commit::Applied { dispose, install } => Ok(EventOutcome {
                session: session.to_string(),
                sequence: Some(token.value()),
                status: OutcomeStatus::Applied,
                dispose,
                install,
            }),
            Commit::Stale => {
                tracing::debug!(
                    "Dropping stale heatmap #{} for session {} (latest #{})",
                    token.value(),
                    session,
                    state.last_committed()
                );
                Ok(EventOutcome::stale(session, token.value()))
            }
        }
    }

    pub fn decorations(&self, session: &str) -> Result<SessionDecorations> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
        let state = sessions
            .get(session)
            .ok_or_else(|| AppError::SessionNotFound(session.to_string()))?;

        Ok(SessionDecorations {
            session: session.to_string(),
            sequence: state.last_committed(),
            decorations: state.applied().to_vec(),
        })
    }

    /// Drop a session; the caller disposes the returned decorations.
    ///
    /// This is the only way a session leaves the registry. A plugin that
    /// exits without calling it keeps its entry, and the decorations it
    /// holds, until the daemon stops.
    pub fn close(&self, session: &str) -> Result<SessionClosed> {
        let mut state = self
            .write()?
            .remove(session)
            .ok_or_else(|| AppError::SessionNotFound(session.to_string()))?;

        Ok(SessionClosed {
            session: session.to_string(),
            dispose: state.dispose_all(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, EditorSession>>> {
        self.sessions
            .write()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))
    }
}
