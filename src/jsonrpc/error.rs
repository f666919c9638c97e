//! JSON-RPC error taxonomy
//!
//! The five reserved JSON-RPC 2.0 error kinds with their fixed codes and default
//! messages, plus the failure type method handlers return.

use serde_json::Value;
use thiserror::Error;

use crate::jsonrpc::response::ErrorObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl ErrorKind {
    pub const fn code(self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }

    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Invalid JSON was received by the server.",
            Self::InvalidRequest => "The JSON sent is not a valid Request object.",
            Self::MethodNotFound => "The method does not exist / is not available.",
            Self::InvalidParams => "Invalid method parameter(s).",
            Self::InternalError => "Internal JSON-RPC error.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageStyle {
    #[default]
    Legacy,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} ({})", .kind.default_message(), .kind.code())]
pub struct RpcError {
    pub kind: ErrorKind,
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, data: None }
    }

    pub fn with_data(kind: ErrorKind, data: impl Into<Value>) -> Self {
        Self {
            kind,
            data: Some(data.into()),
        }
    }

    pub fn parse_error(diagnostic: impl Into<String>) -> Self {
        Self::with_data(ErrorKind::ParseError, diagnostic.into())
    }

    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::with_data(ErrorKind::InvalidRequest, reason.into())
    }

    pub fn method_not_found() -> Self {
        Self::new(ErrorKind::MethodNotFound)
    }

    pub fn internal(data: impl Into<Value>) -> Self {
        Self::with_data(ErrorKind::InternalError, data)
    }

    pub fn to_object(&self, style: MessageStyle) -> ErrorObject {
        let default_message = self.kind.default_message();
        let message = match (style, self.data.as_ref()) {
            (MessageStyle::Legacy, Some(Value::String(text))) if !text.is_empty() => {
                format!("{default_message} {}", capitalize(text))
            }
            _ => default_message.to_string(),
        };

        ErrorObject {
            code: self.kind.code(),
            message,
            data: self.data.clone(),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum MethodError {
    #[error("argument '{name}' has an unexpected type: {source}")]
    ArgumentType {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("argument '{0}' is not declared by the method signature")]
    UndeclaredArgument(String),
    #[error("{message}")]
    Failed {
        message: String,
        data: Option<Value>,
    },
}

impl MethodError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            data: None,
        }
    }

    pub fn failed_with_data(message: impl Into<String>, data: Value) -> Self {
        Self::Failed {
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Failed { data, .. } => data.as_ref(),
            _ => None,
        }
    }
}

impl From<MethodError> for RpcError {
    fn from(err: MethodError) -> Self {
        // Null or empty data falls back to the failure text.
        let data = err
            .data()
            .filter(|data| !matches!(data, Value::Null) && data.as_str() != Some(""))
            .cloned()
            .unwrap_or_else(|| Value::String(err.to_string()));
        RpcError::internal(data)
    }
}
