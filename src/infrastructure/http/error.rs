//! JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::dto::ErrorResponseDto;
use crate::application::services::{
    CharacterPipelineError, ImageServiceError, NameServiceError, PromptEnhancerError,
};

/// Error rendered as `{"error": message}` with the given status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed: {}", self.message);
        } else {
            tracing::debug!("Request rejected ({}): {}", self.status, self.message);
        }
        (
            self.status,
            Json(ErrorResponseDto {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<NameServiceError> for ApiError {
    fn from(e: NameServiceError) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<PromptEnhancerError> for ApiError {
    fn from(e: PromptEnhancerError) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<ImageServiceError> for ApiError {
    fn from(e: ImageServiceError) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<CharacterPipelineError> for ApiError {
    fn from(e: CharacterPipelineError) -> Self {
        tracing::error!("Character pipeline aborted: {} ({})", e, e.cause());
        Self::internal(e.to_string())
    }
}
