//! API route handlers for editor plugins.
//!
//! Each submodule defines routes for a feature area:
//! - `events`: Editor events in, decoration directives out
//! - `sessions`: Inspect or close an editor session
//! - `health`: Liveness check

pub mod events;
pub mod health;
pub mod sessions;

use axum::Router;

use crate::git::GitRunner;
use crate::heatmap::SharedService;

pub fn create_router<R: GitRunner + 'static>(service: SharedService<R>) -> Router {
    Router::new()
        .merge(events::routes(service.clone()))
        .merge(sessions::routes(service))
        .merge(health::routes())
}
