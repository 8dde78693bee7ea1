use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use messg_types::api::{ErrorResponse, UnauthorizedResponse};

use crate::service::MessageError;

pub const NOT_FOUND_MESSAGE: &str = "Not found";

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(msg: impl std::fmt::Display) -> Self {
        Self::Internal(msg.to_string())
    }
}

impl From<MessageError> for ApiError {
    fn from(err: MessageError) -> Self {
        match err {
            MessageError::NotFound => Self::NotFound,
            MessageError::Validation(msg) => Self::Validation(msg),
            MessageError::Store(e) => Self::Internal(format!("{:#}", e)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Unauthorized => (status, Json(UnauthorizedResponse::default())).into_response(),
            Self::NotFound => (status, Json(ErrorResponse::new(NOT_FOUND_MESSAGE))).into_response(),
            Self::Validation(msg) => (status, Json(ErrorResponse::new(msg))).into_response(),
            Self::Internal(cause) => {
                error!("Request failed: {}", cause);
                (status, Json(ErrorResponse::new("Internal server error"))).into_response()
            }
        }
    }
}
