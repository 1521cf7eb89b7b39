//! Runtime half of the framework: the type registry, the primitive codecs
//! and the dispatcher that generated code recurses through.
//!
//! Values are handed around as `&dyn Any`. Pointer and string fields are
//! stored as `Option<Box<T>>` / `Option<String>` (`None` is the null
//! pointer), arrays as `Option<Vec<_>>` of such slots, and everything else is
//! embedded inline in the record.
pub mod dispatch;
pub mod global;
pub mod primitive;
pub mod registry;
pub mod slot;

pub use std::any::Any;

pub use serde_json::Value;

pub use crate::error::{Error, Result};
pub use crate::schema::{Field, FieldType, Record};
pub use dispatch::{
    downcast, downcast_mut, expect_object, field, free_array, free_value, marshal_array_value,
    marshal_value, release_value, required, unmarshal_array_field, unmarshal_array_value,
    unmarshal_field, unmarshal_required, unmarshal_slot, unmarshal_value,
};
pub use registry::{MarshalFn, Registry, RegistryBuilder, RegistryEntry, ReleaseFn, UnmarshalFn};
pub use slot::Slot;

pub type Map = serde_json::Map<String, Value>;

/// Reports a configuration error that cannot be recovered from.
pub fn fatal(name: &str, reason: &str) -> ! {
    log::error!("marshaller ({name}): {reason}");
    panic!("panic: marshaller ({name}): {reason}")
}
