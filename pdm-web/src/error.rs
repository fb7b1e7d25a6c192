//! Error types for pdm-web
//!
//! Every failure that reaches a handler is rendered as an HTML message page;
//! internal details stay in the log.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::api::ui::pages;

/// Handler-level error
#[derive(Debug, Error)]
pub enum WebError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// pdm-common error
    #[error(transparent)]
    Common(#[from] pdm_common::Error),
}

impl WebError {
    /// Status code, page title and user-facing message
    pub fn describe(&self) -> (StatusCode, &'static str, String) {
        use pdm_common::Error as E;

        match self {
            WebError::NotFound(_) | WebError::Common(E::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Not found", "File not found".to_string())
            }
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", msg.clone()),
            WebError::Common(E::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "Input error", msg.clone())
            }
            WebError::Common(E::Schema(msg)) => {
                (StatusCode::BAD_REQUEST, "Invalid upload", msg.clone())
            }
            WebError::Common(E::Prediction(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Prediction failed",
                "The model could not process this input.".to_string(),
            ),
            WebError::Io(_) | WebError::Common(E::Io(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "File error",
                "The file could not be stored or read.".to_string(),
            ),
            WebError::Common(E::Model(_)) | WebError::Common(E::Config(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error",
                "The service is misconfigured.".to_string(),
            ),
        }
    }

    /// Log at a level matching the status class
    pub fn log(&self, status: StatusCode) {
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, title, message) = self.describe();
        self.log(status);
        (status, Html(pages::message_page(title, &message))).into_response()
    }
}

/// Result type for handlers
pub type WebResult<T> = Result<T, WebError>;
