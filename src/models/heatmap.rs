//! Heatmap data transfer objects.
//!
//! Exchanged with editor plugins as JSON, and printed by `show --json`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// End column of a whole-line range: past the end of any real line.
pub const LINE_END: u32 = u32::MAX;

/// Range in editor coordinates (zero-based lines and columns).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineRange {
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
}

impl LineRange {
    pub fn whole_line(line: u32) -> Self {
        Self {
            start_line: line,
            start_character: 0,
            end_line: line,
            end_character: LINE_END,
        }
    }
}

/// Lines sharing one rounded opacity; rendered with a single decoration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpacityBatch {
    pub opacity: f64,
    pub ranges: Vec<LineRange>,
}

/// An installed batch. Ids are unique within a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Decoration {
    pub id: u64,
    pub opacity: f64,
    pub ranges: Vec<LineRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRef {
    pub path: PathBuf,
    /// Unsaved buffer with no backing file.
    #[serde(default)]
    pub untitled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditorEvent {
    ActiveEditorChanged {
        document: Option<DocumentRef>,
    },
    DocumentOpened {
        document: DocumentRef,
        #[serde(default)]
        active_document: Option<DocumentRef>,
    },
}

impl EditorEvent {
    /// Document to decorate, or `None` when the event changes nothing.
    ///
    /// An opened document only counts when it is the one in the active editor.
    pub fn target(&self) -> Option<&DocumentRef> {
        match self {
            EditorEvent::ActiveEditorChanged { document } => document.as_ref(),
            EditorEvent::DocumentOpened {
                document,
                active_document,
            } => (active_document.as_ref() == Some(document)).then_some(document),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Applied,
    Stale,
    Ignored,
}

/// Directives for the plugin: dispose `dispose`, then install `install`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventOutcome {
    pub session: String,
    pub sequence: Option<u64>,
    pub status: OutcomeStatus,
    pub dispose: Vec<u64>,
    pub install: Vec<Decoration>,
}

impl EventOutcome {
    pub fn ignored(session: &str) -> Self {
        Self::unchanged(session, None, OutcomeStatus::Ignored)
    }

    pub fn stale(session: &str, sequence: u64) -> Self {
        Self::unchanged(session, Some(sequence), OutcomeStatus::Stale)
    }

    fn unchanged(session: &str, sequence: Option<u64>, status: OutcomeStatus) -> Self {
        Self {
            session: session.to_string(),
            sequence,
            status,
            dispose: Vec::new(),
            install: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDecorations {
    pub session: String,
    pub sequence: u64,
    pub decorations: Vec<Decoration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClosed {
    pub session: String,
    pub dispose: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
