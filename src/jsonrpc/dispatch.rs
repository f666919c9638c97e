//! The JSON-RPC dispatch engine
//!
//! Normalizes a request, resolves every call against the registry, binds its
//! arguments, invokes the method and classifies the outcome into a response
//! entry. Nothing raised by a method escapes this module.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::jsonrpc::{
    batch::{assemble, BatchOutput},
    binding::{Arguments, BindError},
    error::{ErrorKind, MessageStyle, RpcError},
    normalize::{normalize, RpcInput},
    params::Params,
    registry::{MethodRegistry, RpcMethod},
    response::ResponseEntry,
};

pub const NO_RESULT_MESSAGE: &str = "No result from JSON-RPC method.";
pub const PANIC_MESSAGE: &str = "JSON-RPC method panicked.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationErrors {
    #[default]
    Report,
    Suppress,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    pub debug: bool,
    pub message_style: MessageStyle,
    pub notification_errors: NotificationErrors,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub jsonrpc: Option<Value>,
    pub method: String,
    // `None` when the id is absent or null, i.e. a notification.
    pub id: Option<Value>,
    pub params: Option<Value>,
}

impl Call {
    pub fn from_value(value: Value) -> Result<Self, RpcError> {
        let Value::Object(mut object) = value else {
            return Err(RpcError::invalid_request("request must be a JSON object"));
        };

        let method = match object.remove("method") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(method)) => method,
            Some(other) => other.to_string(),
        };

        Ok(Self {
            jsonrpc: object.remove("jsonrpc").filter(|value| !value.is_null()),
            method,
            id: object.remove("id").filter(|value| !value.is_null()),
            params: object.remove("params"),
        })
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<MethodRegistry>,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(registry: Arc<MethodRegistry>, options: DispatchOptions) -> Self {
        Self { registry, options }
    }

    pub async fn handle(&self, input: RpcInput<'_>) -> Option<BatchOutput> {
        if self.options.debug {
            log_raw_input(&input);
        }

        let normalized = match normalize(input) {
            Ok(normalized) => normalized,
            Err(err) => {
                warn!(error = ?err.data, "json-rpc request could not be decoded");
                return Some(BatchOutput::Single(ResponseEntry::failure(
                    None,
                    None,
                    &err,
                    self.options.message_style,
                )));
            }
        };

        let mut entries = Vec::with_capacity(normalized.calls.len());
        for call in normalized.calls {
            entries.push(self.dispatch(call).await);
        }

        let output = assemble(entries);
        if self.options.debug {
            let rendered = output
                .as_ref()
                .and_then(|output| output.to_json().ok())
                .unwrap_or_default();
            info!(batch = normalized.batch, response = %rendered, "json-rpc response");
        }
        output
    }

    pub async fn dispatch(&self, call: Value) -> Option<ResponseEntry> {
        let call = match Call::from_value(call) {
            Ok(call) => call,
            Err(err) => {
                warn!(error = ?err.data, "json-rpc call is not a valid request object");
                return Some(ResponseEntry::failure(
                    None,
                    None,
                    &err,
                    self.options.message_style,
                ));
            }
        };

        if self.options.debug {
            info!(
                jsonrpc = ?call.jsonrpc,
                method = %call.method,
                id = ?call.id,
                params = ?call.params,
                "json-rpc call"
            );
        }

        let audit_params = redact_audit_params(call.params.as_ref());
        let outcome = self.invoke(&call).await;
        let entry = self.classify(&call, outcome);

        let outcome = match &entry {
            Some(entry) if entry.is_error() => "failure",
            Some(_) => "success",
            None => "suppressed",
        };
        info!(
            method = %call.method,
            id = ?call.id,
            params = %audit_params,
            outcome,
            "json-rpc call audited"
        );

        entry
    }

    async fn invoke(&self, call: &Call) -> Result<Value, RpcError> {
        let method = self.registry.resolve(&call.method).inspect_err(|_| {
            warn!(method = %call.method, "json-rpc method not found");
        })?;

        let args = Params::split(call.params.clone())
            .and_then(|params| method.signature().bind(params))
            .map_err(|err| {
                warn!(
                    method = %call.method,
                    error = %err,
                    "json-rpc parameters do not match signature"
                );
                invalid_params(&err)
            })?;

        run_isolated(method, args, &call.method).await
    }

    fn classify(&self, call: &Call, outcome: Result<Value, RpcError>) -> Option<ResponseEntry> {
        let style = self.options.message_style;
        match outcome {
            Ok(Value::Null) if call.is_notification() => None,
            Ok(Value::Null) => {
                error!(method = %call.method, "no result from json-rpc method");
                Some(ResponseEntry::failure(
                    call.jsonrpc.clone(),
                    call.id.clone(),
                    &RpcError::internal(NO_RESULT_MESSAGE),
                    style,
                ))
            }
            Ok(_) if call.is_notification() => None,
            Ok(result) => Some(ResponseEntry::success(
                call.jsonrpc.clone(),
                call.id.clone(),
                result,
            )),
            Err(_)
                if call.is_notification()
                    && self.options.notification_errors == NotificationErrors::Suppress =>
            {
                None
            }
            Err(err) => Some(ResponseEntry::failure(
                call.jsonrpc.clone(),
                call.id.clone(),
                &err,
                style,
            )),
        }
    }
}

fn invalid_params(err: &BindError) -> RpcError {
    RpcError::with_data(ErrorKind::InvalidParams, err.to_string())
}

// Runs the method on its own task so a panic becomes an InternalError.
async fn run_isolated(
    method: Arc<dyn RpcMethod>,
    args: Arguments,
    name: &str,
) -> Result<Value, RpcError> {
    match tokio::spawn(async move { method.call(args).await }).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            error!(method = %name, error = %err, "json-rpc method failed");
            Err(err.into())
        }
        Err(join_error) if join_error.is_panic() => {
            error!(method = %name, "json-rpc method panicked");
            Err(RpcError::internal(PANIC_MESSAGE))
        }
        Err(join_error) => {
            error!(method = %name, error = %join_error, "json-rpc method task failed");
            Err(RpcError::internal(join_error.to_string()))
        }
    }
}

fn log_raw_input(input: &RpcInput<'_>) {
    match input {
        RpcInput::Body(body) => {
            info!(raw_body = %String::from_utf8_lossy(body), "json-rpc raw request body");
        }
        RpcInput::Query(query) => {
            info!(params = ?query.get("params"), "json-rpc raw query params");
        }
    }
}

pub fn redact_audit_params(params: Option<&Value>) -> Value {
    params.map(redact_audit_value).unwrap_or(Value::Null)
}

pub fn redact_audit_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact_audit_value(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_audit_value).collect()),
        _ => value.clone(),
    }
}

pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    matches!(
        normalized.as_str(),
        "authorization" | "bearer" | "api_key" | "apikey"
    ) || normalized.contains("token")
        || normalized.contains("secret")
        || normalized.contains("password")
        || normalized.contains("credential")
}
