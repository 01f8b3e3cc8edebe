//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flashcard_core::DeckError;
use serde::Serialize;
use thiserror::Error;

use crate::services::render::RenderError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Answer is hidden until revealed")]
    AnswerHidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No document uploaded for this session")]
    NoDocument,

    #[error("Document has no pages")]
    EmptyDeck,

    #[error("Page index {index} out of range (document has {total} pages)")]
    IndexOutOfRange { index: usize, total: usize },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::InvalidDocument(_) => (StatusCode::BAD_REQUEST, "invalid_document"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::AnswerHidden => (StatusCode::FORBIDDEN, "answer_hidden"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::NoDocument => (StatusCode::CONFLICT, "no_document"),
            ApiError::EmptyDeck => (StatusCode::UNPROCESSABLE_ENTITY, "empty_deck"),
            ApiError::IndexOutOfRange { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "index_out_of_range")
            }
            ApiError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "render_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<DeckError> for ApiError {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::EmptyDeck => ApiError::EmptyDeck,
            DeckError::IndexOutOfRange { index, total } => {
                ApiError::IndexOutOfRange { index, total }
            }
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::InvalidDocument(detail) => ApiError::InvalidDocument(detail),
            RenderError::IndexOutOfRange { index, total } => {
                ApiError::IndexOutOfRange { index, total }
            }
            other => ApiError::Render(other.to_string()),
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
