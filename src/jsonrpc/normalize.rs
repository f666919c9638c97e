//! Request normalization
//!
//! Turns a POST body or GET query mapping into the ordered list of call objects
//! it contains.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::jsonrpc::error::RpcError;

#[derive(Debug, Clone)]
pub enum RpcInput<'a> {
    Body(&'a [u8]),
    Query(HashMap<String, String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub calls: Vec<Value>,
    pub batch: bool,
}

pub fn normalize(input: RpcInput<'_>) -> Result<Normalized, RpcError> {
    match input {
        RpcInput::Body(body) => {
            let payload: Value = serde_json::from_slice(body)
                .map_err(|err| RpcError::parse_error(err.to_string()))?;

            Ok(match payload {
                Value::Array(calls) => Normalized { calls, batch: true },
                call => Normalized {
                    calls: vec![call],
                    batch: false,
                },
            })
        }
        RpcInput::Query(query) => {
            let mut call = Map::new();
            for (key, value) in query {
                let value = if key == "params" {
                    serde_json::from_str(&value)
                        .map_err(|err| RpcError::parse_error(err.to_string()))?
                } else {
                    Value::String(value)
                };
                call.insert(key, value);
            }

            Ok(Normalized {
                calls: vec![Value::Object(call)],
                batch: false,
            })
        }
    }
}
