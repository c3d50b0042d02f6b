//! Session endpoints.
//!
//! - GET /api/v1/sessions/{session}/decorations
//!   Decorations currently installed for the session.
//!   Used by: plugins resynchronizing after a reload
//!
//! - DELETE /api/v1/sessions/{session}
//!   Forgets the session and returns the decoration ids to dispose.
//!   Used by: plugins on editor shutdown

use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};

use crate::error::Result;
use crate::git::GitRunner;
use crate::heatmap::SharedService;
use crate::models::{SessionClosed, SessionDecorations};

pub fn routes<R: GitRunner + 'static>(service: SharedService<R>) -> Router {
    Router::new()
        .route("/api/v1/sessions/{session}/decorations", get(get_decorations::<R>))
        .route("/api/v1/sessions/{session}", delete(close_session::<R>))
        .with_state(service)
}

async fn get_decorations<R: GitRunner>(
    State(service): State<SharedService<R>>,
    Path(session): Path<String>,
) -> Result<Json<SessionDecorations>> {
    Ok(Json(service.decorations(&session)?))
}

async fn close_session<R: GitRunner>(
    State(service): State<SharedService<R>>,
    Path(session): Path<String>,
) -> Result<Json<SessionClosed>> {
    Ok(Json(service.close(&session)?))
}
