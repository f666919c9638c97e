//! Method registry
//!
//! Methods are registered explicitly by the hosting application while the
//! registry is built; the finished `MethodRegistry` is immutable and shared
//! across requests behind an `Arc`.

use std::{collections::HashMap, future::Future, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::jsonrpc::{
    binding::{Arguments, Signature},
    error::{MethodError, RpcError},
};

pub const DISPATCH_ENTRY_POINT: &str = "default";
pub const RESERVED_PREFIX: &str = "_";

// Returning `Value::Null` means "no result".
#[async_trait]
pub trait RpcMethod: Send + Sync {
    fn signature(&self) -> &Signature;

    async fn call(&self, args: Arguments) -> Result<Value, MethodError>;
}

pub struct FnMethod<F> {
    signature: Signature,
    handler: F,
}

impl<F> FnMethod<F> {
    pub fn new(signature: Signature, handler: F) -> Self {
        Self { signature, handler }
    }
}

#[async_trait]
impl<F, Fut> RpcMethod for FnMethod<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, MethodError>> + Send,
{
    fn signature(&self) -> &Signature {
        &self.signature
    }

    async fn call(&self, args: Arguments) -> Result<Value, MethodError> {
        (self.handler)(args).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("method name must not be empty")]
    EmptyName,
    #[error("method '{0}' is already registered")]
    Duplicate(String),
    #[error("method name '{0}' is reserved")]
    Reserved(String),
}

#[derive(Default)]
pub struct RegistryBuilder {
    methods: HashMap<String, Arc<dyn RpcMethod>>,
}

impl RegistryBuilder {
    pub fn register(
        &mut self,
        name: impl Into<String>,
        method: impl RpcMethod + 'static,
    ) -> Result<&mut Self, RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if name == DISPATCH_ENTRY_POINT || name.starts_with(RESERVED_PREFIX) {
            return Err(RegistryError::Reserved(name));
        }
        if self.methods.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }

        self.methods.insert(name, Arc::new(method));
        Ok(self)
    }

    pub fn register_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        signature: Signature,
        handler: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, MethodError>> + Send + 'static,
    {
        self.register(name, FnMethod::new(signature, handler))
    }

    pub fn build(self) -> MethodRegistry {
        MethodRegistry {
            methods: self.methods,
        }
    }
}

pub struct MethodRegistry {
    methods: HashMap<String, Arc<dyn RpcMethod>>,
}

impl MethodRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn RpcMethod>, RpcError> {
        self.methods
            .get(name)
            .cloned()
            .ok_or_else(RpcError::method_not_found)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.names())
            .finish()
    }
}
