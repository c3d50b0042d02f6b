//! Error types and HTTP response mapping.
//!
//! - `BlameError`: why line attribution could not be produced for a file
//! - `Unavailable`: why an editor event produced no decorations
//! - `ConfigError`: rejected command-line settings
//! - `AppError`: daemon errors, converted to JSON responses by Axum
//!
//! Error mappings:
//! - `SessionNotFound` → 404
//! - `Internal` → 500
//!
//! `BlameError` and `Unavailable` never reach a response: the event handler
//! logs them and answers with an empty set of decorations.

use std::path::PathBuf;
use std::process::ExitStatus;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlameError {
    #[error("failed to launch `git {command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{} is not inside a git work tree: {reason}", .path.display())]
    NotInRepository { path: PathBuf, reason: String },

    #[error("no attributable lines in {}", .0.display())]
    NoAttribution(PathBuf),

    #[error("cannot blame {}: no file name or parent directory", .0.display())]
    InvalidPath(PathBuf),
}

#[derive(Error, Debug)]
pub enum Unavailable {
    #[error("document is untitled")]
    Untitled,

    #[error(transparent)]
    Blame(#[from] BlameError),
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("opacity bounds must satisfy 0 <= min <= max <= 1 (got min {min}, max {max})")]
    InvalidScale { min: f64, max: f64 },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
