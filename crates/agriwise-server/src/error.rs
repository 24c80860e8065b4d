//! HTTP error mapping
//!
//! Every failure leaves the server as `{"success": false, "error", "timestamp"}`.

use crate::session::SessionError;
use agriwise_domain::ValidationError;
use axum::{
    extract::rejection::{BytesRejection, JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error message
    pub error: String,
    /// When the error was produced
    pub timestamp: DateTime<Utc>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed or expired bearer token
    Unauthorized(SessionError),
    /// Token could not be issued
    SessionError(SessionError),
    /// Profile failed domain validation
    Validation(ValidationError),
    /// Request could not be understood
    BadRequest(String),
    /// Request body exceeds the configured upload limit
    PayloadTooLarge(String),
    /// Internal server error
    InternalError(String),
}

impl AppError {
    /// Status code this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::SessionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map an extractor rejection: oversized bodies keep 413, the rest are 400
    fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else {
            AppError::BadRequest(message)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Unauthorized(e) => {
                warn!("Rejected request: {}", e);
                "Invalid token".to_string()
            }
            AppError::SessionError(e) => {
                error!("Session error: {}", e);
                e.to_string()
            }
            AppError::Validation(e) => {
                warn!("Validation failed: {}", e);
                e.to_string()
            }
            AppError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                msg
            }
            AppError::PayloadTooLarge(msg) => {
                warn!("Request body too large: {}", msg);
                msg
            }
            AppError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                msg
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: message,
            timestamp: Utc::now(),
        });
        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::SessionError(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::from_rejection(e.status(), e.body_text())
    }
}

impl From<BytesRejection> for AppError {
    fn from(e: BytesRejection) -> Self {
        AppError::from_rejection(e.status(), e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::from_rejection(e.status(), e.body_text())
    }
}
