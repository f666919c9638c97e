//! Argument binding against declared method signatures
//!
//! Binding happens before a handler runs, so an arity or name mismatch is
//! reported as a distinct `BindError` rather than surfacing from inside the call.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::jsonrpc::{error::MethodError, params::Params};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("takes at most {expected} positional argument(s) but {given} were given")]
    TooManyPositional { expected: usize, given: usize },
    #[error("missing required argument '{0}'")]
    Missing(String),
    #[error("got an unexpected named argument '{0}'")]
    Unexpected(String),
    #[error("got multiple values for argument '{0}'")]
    Duplicate(String),
    #[error("reserved key '__args' must hold an array")]
    PositionalArgsNotArray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Param {
    name: String,
    required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Param>,
    variadic: bool,
    open_named: bool,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required_params<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(Self::new(), |signature, name| signature.required(name))
    }

    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            required: false,
        });
        self
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn open_named(mut self) -> Self {
        self.open_named = true;
        self
    }

    pub fn bind(&self, params: Params) -> Result<Arguments, BindError> {
        let Params { positional, named } = params;

        let declared = self.params.len();
        if positional.len() > declared && !self.variadic {
            return Err(BindError::TooManyPositional {
                expected: declared,
                given: positional.len(),
            });
        }

        let mut values: Vec<Option<Value>> = vec![None; declared];
        let mut positional = positional.into_iter();
        for slot in values.iter_mut() {
            match positional.next() {
                Some(value) => *slot = Some(value),
                None => break,
            }
        }
        let rest: Vec<Value> = positional.collect();

        let mut extra = Map::new();
        for (key, value) in named {
            match self.params.iter().position(|param| param.name == key) {
                Some(index) if values[index].is_some() => {
                    return Err(BindError::Duplicate(key));
                }
                Some(index) => values[index] = Some(value),
                None if self.open_named => {
                    extra.insert(key, value);
                }
                None => return Err(BindError::Unexpected(key)),
            }
        }

        if let Some(param) = self
            .params
            .iter()
            .zip(values.iter())
            .find_map(|(param, value)| (param.required && value.is_none()).then_some(param))
        {
            return Err(BindError::Missing(param.name.clone()));
        }

        let bound = self
            .params
            .iter()
            .zip(values)
            .map(|(param, value)| (param.name.clone(), value))
            .collect();

        Ok(Arguments { bound, rest, extra })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    bound: Vec<(String, Option<Value>)>,
    rest: Vec<Value>,
    extra: Map<String, Value>,
}

impl Arguments {
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, MethodError> {
        let value = self.value(name)?.cloned().unwrap_or(Value::Null);
        decode(name, value)
    }

    pub fn get_opt<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, MethodError> {
        self.value(name)?
            .cloned()
            .map(|value| decode(name, value))
            .transpose()
    }

    pub fn rest(&self) -> &[Value] {
        &self.rest
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    fn value(&self, name: &str) -> Result<Option<&Value>, MethodError> {
        self.bound
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value.as_ref())
            .ok_or_else(|| MethodError::UndeclaredArgument(name.to_string()))
    }
}

fn decode<T: DeserializeOwned>(name: &str, value: Value) -> Result<T, MethodError> {
    serde_json::from_value(value).map_err(|source| MethodError::ArgumentType {
        name: name.to_string(),
        source,
    })
}
