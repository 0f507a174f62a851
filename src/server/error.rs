//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::wire::ErrorResponse;
use crate::CookError;

/// An error rendered as `{"error": "..."}` with a matching status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        let message = msg.into();
        if status.is_server_error() {
            tracing::error!("Internal error: {}", message);
        } else {
            tracing::warn!("Request rejected ({}): {}", status, message);
        }
        Self { status, message }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        let message = msg.into();
        tracing::warn!("Bad request: {}", message);
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        let message = msg.into();
        tracing::error!("Internal error: {}", message);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl From<CookError> for ApiError {
    fn from(err: CookError) -> Self {
        if err.is_client_error() {
            Self::bad_request(err.to_string())
        } else {
            Self::internal_error(format!("internal error while processing image: {err}"))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_map_to_500() {
        let err: ApiError = CookError::Decode("bad header".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("bad header"));
    }

    #[test]
    fn invalid_input_maps_to_400() {
        let err: ApiError = CookError::InvalidInput("empty".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn into_response_keeps_status() {
        let response = ApiError::bad_request("nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
