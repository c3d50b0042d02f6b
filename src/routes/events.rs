//! Editor event endpoint.
//!
//! POST /api/v1/sessions/{session}/events
//!
//! Body is an `EditorEvent` (`active_editor_changed` or `document_opened`).
//! Returns an `EventOutcome`: decoration ids to dispose, then decorations to
//! install. A file that cannot be blamed still answers `applied`, with nothing
//! to install.
//!
//! Used by: editor plugins on active-editor and document-open notifications

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};

use crate::error::Result;
use crate::git::GitRunner;
use crate::heatmap::SharedService;
use crate::models::{EditorEvent, EventOutcome};

pub fn routes<R: GitRunner + 'static>(service: SharedService<R>) -> Router {
    Router::new()
        .route("/api/v1/sessions/{session}/events", post(post_event::<R>))
        .with_state(service)
}

async fn post_event<R: GitRunner>(
    State(service): State<SharedService<R>>,
    Path(session): Path<String>,
    Json(event): Json<EditorEvent>,
) -> Result<Json<EventOutcome>> {
    let outcome = service.handle_event(&session, &event).await?;
    Ok(Json(outcome))
}
