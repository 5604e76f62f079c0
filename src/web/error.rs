//! Error type of the HTTP surface and its status code mapping.

use crate::libs::auth::AuthError;
use crate::libs::engine::{Ignored, RenameError, UnknownTask};
use crate::libs::messages::Message;
use crate::libs::task::ParseFilterError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No session, or bad credentials.
    #[error("{0}")]
    Unauthorized(Message),
    #[error("{0}")]
    BadRequest(Message),
    #[error("{0}")]
    NotFound(Message),
    #[error("{0}")]
    Conflict(Message),
    /// Well-formed request the task list refuses, such as a blank name.
    #[error("{0}")]
    Unprocessable(Message),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_logged_in() -> Self {
        ApiError::Unauthorized(Message::NotLoggedIn)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show to the client. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => Message::InternalError.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            tracing::error!(error = %e, "request failed");
        }
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}

impl From<UnknownTask> for ApiError {
    fn from(value: UnknownTask) -> Self {
        ApiError::NotFound(Message::TaskNotFound(value.0 .0))
    }
}

impl From<Ignored> for ApiError {
    fn from(_: Ignored) -> Self {
        ApiError::Unprocessable(Message::BlankTaskName)
    }
}

impl From<RenameError> for ApiError {
    fn from(value: RenameError) -> Self {
        match value {
            RenameError::UnknownTask(unknown) => unknown.into(),
            RenameError::BlankName => ApiError::Unprocessable(Message::BlankTaskName),
        }
    }
}

impl From<ParseFilterError> for ApiError {
    fn from(value: ParseFilterError) -> Self {
        ApiError::Unprocessable(Message::InvalidFilter(value.0))
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::MissingCredentials => ApiError::BadRequest(Message::MissingCredentials),
            AuthError::DuplicateUsername(username) => ApiError::Conflict(Message::UsernameTaken(username)),
            AuthError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(value: tokio::task::JoinError) -> Self {
        ApiError::Internal(value.to_string())
    }
}
