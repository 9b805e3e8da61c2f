//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::settlement::responses::SettlementErrorResponse;
use crate::settlement::SettlementError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::Settlement(e) => {
                let status = match e {
                    // Boundary payloads we could not normalize are the
                    // caller's problem; everything else is a validation
                    // failure in otherwise well-formed input.
                    SettlementError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                };
                tracing::warn!("settlement error: {}", e);
                (status, e.error_type().to_string(), e.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal".to_string(),
                    "Internal error".to_string(),
                )
            }
        };

        let body = SettlementErrorResponse { error_type, message };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
