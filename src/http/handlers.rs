//! Axum HTTP handlers for the web server
//!
//! Provides the JSON-RPC endpoint and a health probe.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::jsonrpc::RpcInput;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn rpc_endpoint(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let input = match method {
        Method::POST => RpcInput::Body(&body),
        Method::GET => RpcInput::Query(query),
        other => return Err(AppError::UnsupportedMethod(other)),
    };

    let Some(output) = state.dispatcher.handle(input).await else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let text = output.to_json().map_err(|err| {
        AppError::internal(format!("failed to serialize json-rpc response: {err}"))
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, state.content_type.clone())],
        text,
    )
        .into_response())
}
