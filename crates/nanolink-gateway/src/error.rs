use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nanolink_core::ShortenerError;
use thiserror::Error;
use tracing::{error, warn};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Short code not found")]
    NotFound,
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Causes of 5xx responses stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Validation(message) => message.clone(),
            AppError::NotFound => "Short code not found".to_string(),
            AppError::Unavailable(_) => "Service temporarily unavailable".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        match err {
            ShortenerError::InvalidUrl(message) => AppError::Validation(message),
            ShortenerError::Exhausted { attempts } => AppError::Unavailable(format!(
                "no free short code after {attempts} attempts"
            )),
            ShortenerError::Storage(source) => AppError::Internal(source.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Unavailable(cause) => warn!(cause = %cause, "request failed"),
            AppError::Internal(cause) => error!(cause = %cause, "request failed"),
            AppError::Validation(_) | AppError::NotFound => {}
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
