//! Positional / named parameter splitting
//!
//! A `params` array is purely positional. A `params` object is named, except for
//! the reserved `__args` key whose array value supplies positional arguments next
//! to the named ones. `__args` is a vendor extension beyond JSON-RPC 2.0.

use serde_json::{Map, Value};

use crate::jsonrpc::binding::BindError;

pub const POSITIONAL_ARGS_KEY: &str = "__args";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    pub positional: Vec<Value>,
    pub named: Map<String, Value>,
}

impl Params {
    pub fn split(params: Option<Value>) -> Result<Self, BindError> {
        match params {
            Some(Value::Array(positional)) => Ok(Self {
                positional,
                named: Map::new(),
            }),
            Some(Value::Object(mut named)) => {
                let positional = match named.remove(POSITIONAL_ARGS_KEY) {
                    Some(Value::Array(items)) => items,
                    Some(_) => return Err(BindError::PositionalArgsNotArray),
                    None => Vec::new(),
                };
                Ok(Self { positional, named })
            }
            // Scalars and null carry no arguments.
            _ => Ok(Self::default()),
        }
    }
}
