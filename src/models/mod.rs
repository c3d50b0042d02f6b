//! Data transfer objects (DTOs) exchanged with editor plugins.
//!
//! - `heatmap`: LineRange, OpacityBatch, Decoration for rendering directives;
//!   EditorEvent, DocumentRef for incoming events; EventOutcome and
//!   session snapshots for responses

pub mod heatmap;

pub use heatmap::*;
