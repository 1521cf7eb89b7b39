//! Built-in codecs for the primitive kinds.
use serde_json::{Number, Value};

use crate::error::{Error, Result};
use crate::schema::Primitive;

use super::{Any, dispatch::downcast};

pub fn marshal(kind: Primitive, value: &dyn Any) -> Result<Value> {
    Ok(match kind {
        Primitive::Char => Value::from(*downcast::<i8>(value)?),
        Primitive::Short => Value::from(*downcast::<i16>(value)?),
        Primitive::Int => Value::from(*downcast::<i32>(value)?),
        Primitive::Long | Primitive::LongLong => Value::from(*downcast::<i64>(value)?),
        Primitive::Float => real(kind, f64::from(*downcast::<f32>(value)?))?,
        Primitive::Double => real(kind, *downcast::<f64>(value)?)?,
        Primitive::Bool => Value::Bool(*downcast::<bool>(value)?),
        Primitive::String => Value::String(downcast::<String>(value)?.clone()),
    })
}

/// Allocates one value of `kind`. Numeric kinds take integers and reals
/// alike; reals are truncated toward zero for the integer kinds, and every
/// integer is narrowed to the target width with wrapping.
pub fn unmarshal(kind: Primitive, value: &Value) -> Result<Box<dyn Any>> {
    let invalid = || Error::InvalidInput(kind.name().to_owned());
    Ok(match kind {
        Primitive::Char => boxed(integer(value).ok_or_else(invalid)? as i8),
        Primitive::Short => boxed(integer(value).ok_or_else(invalid)? as i16),
        Primitive::Int => boxed(integer(value).ok_or_else(invalid)? as i32),
        Primitive::Long | Primitive::LongLong => boxed(integer(value).ok_or_else(invalid)?),
        Primitive::Float => boxed(float(value).ok_or_else(invalid)? as f32),
        Primitive::Double => boxed(float(value).ok_or_else(invalid)?),
        Primitive::Bool => boxed(value.as_bool().ok_or_else(invalid)?),
        Primitive::String => boxed(value.as_str().ok_or_else(invalid)?.to_owned()),
    })
}

fn boxed<T: Any>(value: T) -> Box<dyn Any> {
    Box::new(value)
}

fn real(kind: Primitive, x: f64) -> Result<Value> {
    Number::from_f64(x)
        .map(Value::Number)
        .ok_or_else(|| Error::NonFiniteNumber(kind.name().to_owned()))
}

fn integer(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else { return None };
    if let Some(i) = n.as_i64() {
        Some(i)
    } else if let Some(u) = n.as_u64() {
        Some(u as i64)
    } else {
        n.as_f64().map(|f| f as i64)
    }
}

fn float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
