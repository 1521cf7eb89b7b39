//! The single recursion point shared by generated code and the runtime:
//! given a type name, use a primitive codec or the registered record
//! functions.
use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::schema::Primitive;

use super::{Any, Map, Registry, Slot, primitive};

static NULL: Value = Value::Null;

// ————————————————————————————————————————————————————————————————————————————
// MARSHAL
// ————————————————————————————————————————————————————————————————————————————

/// A null value marshals to JSON null whatever its type.
pub fn marshal_value(registry: &Registry, type_name: &str, value: Option<&dyn Any>) -> Result<Value> {
    let Some(value) = value else {
        return Ok(Value::Null);
    };
    match Primitive::from_name(type_name) {
        Some(kind) => primitive::marshal(kind, value),
        None => (registry.require(type_name)?.marshal)(registry, Some(value)),
    }
}

/// Marshals each element in order; the first failing element fails the
/// whole array.
pub fn marshal_array_value<S: Slot>(registry: &Registry, type_name: &str, value: Option<&[S]>) -> Result<Value> {
    let Some(items) = value else {
        return Ok(Value::Null);
    };
    items
        .iter()
        .map(|item| marshal_value(registry, type_name, item.as_dyn()))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

// ————————————————————————————————————————————————————————————————————————————
// UNMARSHAL
// ————————————————————————————————————————————————————————————————————————————

/// JSON null yields `None` for any type, including unregistered ones.
pub fn unmarshal_value(registry: &Registry, type_name: &str, value: &Value) -> Result<Option<Box<dyn Any>>> {
    if value.is_null() {
        return Ok(None);
    }
    match Primitive::from_name(type_name) {
        Some(kind) => primitive::unmarshal(kind, value).map(Some),
        None => (registry.require(type_name)?.unmarshal)(registry, value),
    }
}

/// An element that fails to unmarshal becomes a null entry rather than
/// failing the array. Unknown element types still fail.
pub fn unmarshal_array_value<S: Slot>(registry: &Registry, type_name: &str, value: &Value) -> Result<Option<Vec<S>>> {
    let items = match value {
        Value::Null => return Ok(None),
        Value::Array(items) => items,
        _ => return Err(Error::InvalidInput(format!("[{type_name}]"))),
    };
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let element = match unmarshal_value(registry, type_name, item) {
            Ok(element) => element,
            Err(Error::UnknownType(name)) => return Err(Error::UnknownType(name)),
            Err(err) => {
                debug!("element {index} of `[{type_name}]` left null: {err}");
                None
            }
        };
        out.push(S::from_dyn(element)?);
    }
    Ok(Some(out))
}

pub fn expect_object<'v>(value: &'v Value, type_name: &str) -> Result<&'v Map> {
    value.as_object().ok_or_else(|| Error::InvalidInput(type_name.to_owned()))
}

/// An absent key reads as JSON null.
pub fn field<'v>(object: &'v Map, name: &str) -> &'v Value {
    object.get(name).unwrap_or(&NULL)
}

/// Unmarshals `object[name]`, naming the field in any input error.
pub fn unmarshal_field(registry: &Registry, type_name: &str, object: &Map, name: &str) -> Result<Option<Box<dyn Any>>> {
    unmarshal_value(registry, type_name, field(object, name)).map_err(|err| match err {
        Error::InvalidInput(inner) => Error::InvalidInput(format!("{name}: {inner}")),
        other => other,
    })
}

/// Pointer and string fields: null stays null.
pub fn unmarshal_slot<S: Slot>(registry: &Registry, type_name: &str, object: &Map, name: &str) -> Result<S> {
    S::from_dyn(unmarshal_field(registry, type_name, object, name)?)
}

/// Fields embedded by value: the value is moved out of its temporary box and
/// null is an input error.
pub fn unmarshal_required<T: Any>(registry: &Registry, type_name: &str, object: &Map, name: &str) -> Result<T> {
    required(unmarshal_field(registry, type_name, object, name)?, name)
}

pub fn unmarshal_array_field<S: Slot>(registry: &Registry, type_name: &str, object: &Map, name: &str) -> Result<Option<Vec<S>>> {
    unmarshal_array_value(registry, type_name, field(object, name)).map_err(|err| match err {
        Error::InvalidInput(inner) => Error::InvalidInput(format!("{name}: {inner}")),
        other => other,
    })
}

pub fn required<T: Any>(value: Option<Box<dyn Any>>, name: &str) -> Result<T> {
    let value = value.ok_or_else(|| Error::InvalidInput(format!("{name}: null")))?;
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| mismatch::<T>())
}

// ————————————————————————————————————————————————————————————————————————————
// FREE
// ————————————————————————————————————————————————————————————————————————————

/// Frees a value the caller owns: its owned children first, then its own
/// storage.
pub fn free_value(registry: &Registry, type_name: &str, value: Option<Box<dyn Any>>) -> Result<()> {
    let Some(mut value) = value else {
        return Ok(());
    };
    if Primitive::from_name(type_name).is_none() {
        (registry.require(type_name)?.release)(registry, value.as_mut())?;
    }
    drop(value);
    Ok(())
}

/// Releases only the owned children of a value embedded in its parent's
/// storage. Primitives own nothing.
pub fn release_value(registry: &Registry, type_name: &str, value: Option<&mut dyn Any>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    match Primitive::from_name(type_name) {
        Some(_) => Ok(()),
        None => (registry.require(type_name)?.release)(registry, value),
    }
}

pub fn free_array<S: Slot>(registry: &Registry, type_name: &str, value: Option<Vec<S>>) -> Result<()> {
    let Some(items) = value else {
        return Ok(());
    };
    for item in items {
        free_value(registry, type_name, item.into_dyn())?;
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// DOWNCASTS
// ————————————————————————————————————————————————————————————————————————————

pub fn downcast<T: Any>(value: &dyn Any) -> Result<&T> {
    value.downcast_ref::<T>().ok_or_else(mismatch::<T>)
}

pub fn downcast_mut<T: Any>(value: &mut dyn Any) -> Result<&mut T> {
    value.downcast_mut::<T>().ok_or_else(mismatch::<T>)
}

pub(crate) fn mismatch<T>() -> Error {
    Error::TypeMismatch { expected: std::any::type_name::<T>().to_owned() }
}

// ————————————————————————————————————————————————————————————————————————————
// TEXT ENTRY POINTS
// ————————————————————————————————————————————————————————————————————————————

impl Registry {
    pub fn marshal(&self, type_name: &str, value: Option<&dyn Any>) -> Result<String> {
        Ok(serde_json::to_string(&marshal_value(self, type_name, value)?)?)
    }

    pub fn marshal_array<S: Slot>(&self, type_name: &str, value: Option<&[S]>) -> Result<String> {
        Ok(serde_json::to_string(&marshal_array_value(self, type_name, value)?)?)
    }

    /// A top-level array is refused here; use [`Registry::unmarshal_array`].
    pub fn unmarshal(&self, type_name: &str, text: &str) -> Result<Option<Box<dyn Any>>> {
        let value: Value = serde_json::from_str(text)?;
        if value.is_array() {
            return Err(Error::UnexpectedArray);
        }
        unmarshal_value(self, type_name, &value)
    }

    pub fn unmarshal_as<T: Any>(&self, type_name: &str, text: &str) -> Result<Option<Box<T>>> {
        Slot::from_dyn(self.unmarshal(type_name, text)?)
    }

    pub fn unmarshal_array<S: Slot>(&self, type_name: &str, text: &str) -> Result<Option<Vec<S>>> {
        let value: Value = serde_json::from_str(text)?;
        unmarshal_array_value(self, type_name, &value)
    }

    pub fn free(&self, type_name: &str, value: Option<Box<dyn Any>>) -> Result<()> {
        free_value(self, type_name, value)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
