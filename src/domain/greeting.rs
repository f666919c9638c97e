//! `hello` and `multi`, the demo methods of the bundled server

use serde_json::{Number, Value};

use crate::jsonrpc::{Arguments, MethodError, RegistryBuilder, RegistryError, Signature};

pub fn register(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
    builder
        .register_fn("hello", Signature::required_params(["name"]), hello)?
        .register_fn("multi", Signature::required_params(["num"]), multi)?;
    Ok(())
}

pub async fn hello(args: Arguments) -> Result<Value, MethodError> {
    let name: String = args.get("name")?;
    Ok(Value::String(format!("Hello {name}")))
}

pub async fn multi(args: Arguments) -> Result<Value, MethodError> {
    let num: Number = args.get("num")?;

    if let Some(doubled) = num.as_i64().and_then(|value| value.checked_mul(2)) {
        return Ok(Value::from(doubled));
    }

    // Integers never fall back to floats.
    if num.is_i64() || num.is_u64() {
        return num
            .as_u64()
            .and_then(|value| value.checked_mul(2))
            .map(Value::from)
            .ok_or_else(|| MethodError::failed("integer overflow while doubling num"));
    }

    num.as_f64()
        .and_then(|value| Number::from_f64(value * 2.0))
        .map(Value::Number)
        .ok_or_else(|| MethodError::failed("num cannot be doubled"))
}
