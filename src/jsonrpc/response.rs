//! JSON-RPC response representations
//!
//! Provides the canonical response entry shape and builders for successful and
//! failed calls. `jsonrpc` and `id` are echoed from the call.

use serde::Serialize;
use serde_json::Value;

use crate::jsonrpc::error::{MessageStyle, RpcError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(ErrorObject),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<Value>,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ResponseEntry {
    pub fn success(jsonrpc: Option<Value>, id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc,
            id: id.unwrap_or(Value::Null),
            outcome: Outcome::Result(result),
        }
    }

    pub fn failure(
        jsonrpc: Option<Value>,
        id: Option<Value>,
        error: &RpcError,
        style: MessageStyle,
    ) -> Self {
        Self {
            jsonrpc,
            id: id.unwrap_or(Value::Null),
            outcome: Outcome::Error(error.to_object(style)),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}
