//! Process-wide registry for hosts that register at start-up instead of
//! threading a [`Registry`] through their code.
//!
//! Registration must finish before the first dispatch: the first call to
//! [`registry`] freezes the table, and any registration after that is fatal,
//! as is a duplicate name or a failed freeze.
use std::sync::{Mutex, PoisonError};

use log::info;
use once_cell::sync::{Lazy, OnceCell};

use crate::error::{Error, Result};
use crate::schema::Record;

use super::{Any, MarshalFn, Registry, RegistryBuilder, ReleaseFn, Slot, UnmarshalFn, fatal};

static PENDING: Lazy<Mutex<Option<RegistryBuilder>>> = Lazy::new(|| Mutex::new(Some(RegistryBuilder::new())));
static FROZEN: OnceCell<Registry> = OnceCell::new();

pub fn register_marshaller(
    record: Record,
    size: usize,
    marshal: MarshalFn,
    unmarshal: UnmarshalFn,
    release: ReleaseFn,
) {
    let name = record.primary_name().to_owned();
    install(&name, |builder| builder.register(record, size, marshal, unmarshal, release));
}

/// Runs a generated `register_*` routine against the pending table.
pub fn install(name: &str, register: impl FnOnce(&mut RegistryBuilder) -> Result<()>) {
    let mut pending = PENDING.lock().unwrap_or_else(PoisonError::into_inner);
    let Some(builder) = pending.as_mut() else {
        fatal(name, &Error::Frozen(name.to_owned()).to_string());
    };
    if let Err(err) = register(builder) {
        fatal(name, &err.to_string());
    }
}

/// The pending table is only consumed by a successful freeze, so a failed
/// one stays fatal on every later call.
pub fn registry() -> &'static Registry {
    FROZEN.get_or_init(|| {
        let mut pending = PENDING.lock().unwrap_or_else(PoisonError::into_inner);
        let builder = pending.clone().unwrap_or_default();
        match builder.build() {
            Ok(registry) => {
                pending.take();
                info!("global registry frozen with {} names", registry.len());
                registry
            }
            Err(err) => fatal("registry", &err.to_string()),
        }
    })
}

pub fn marshal(type_name: &str, value: Option<&dyn Any>) -> Result<String> {
    registry().marshal(type_name, value)
}

pub fn marshal_array<S: Slot>(type_name: &str, value: Option<&[S]>) -> Result<String> {
    registry().marshal_array(type_name, value)
}

pub fn unmarshal(type_name: &str, text: &str) -> Result<Option<Box<dyn Any>>> {
    registry().unmarshal(type_name, text)
}

pub fn unmarshal_array<S: Slot>(type_name: &str, text: &str) -> Result<Option<Vec<S>>> {
    registry().unmarshal_array(type_name, text)
}

pub fn free(type_name: &str, value: Option<Box<dyn Any>>) -> Result<()> {
    registry().free(type_name, value)
}
