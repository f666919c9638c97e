//! Transport-level failures of the JSON-RPC endpoint
//!
//! JSON-RPC failures travel inside a 200 response body. Only requests that never
//! reach the dispatcher, or whose output cannot be serialized, end up here.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("http method {0} cannot carry a json-rpc request")]
    UnsupportedMethod(Method),
    #[error("json-rpc response could not be produced: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: &'static str,
    pub details: serde_json::Value,
}

// Attached to rejected responses so the request log can name the cause.
#[derive(Debug, Clone)]
pub struct RejectionReason(pub String);

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::UnsupportedMethod(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        let (code, message) = match self {
            Self::UnsupportedMethod(_) => ("method_not_allowed", "Only GET or POST allowed"),
            Self::Internal(_) => ("internal_error", "internal server error"),
        };
        ErrorResponse {
            code,
            message,
            details: json!({}),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "json-rpc endpoint failed");
        }

        let mut response = (self.status(), Json(self.body())).into_response();
        response
            .extensions_mut()
            .insert(RejectionReason(self.to_string()));
        response
    }
}
