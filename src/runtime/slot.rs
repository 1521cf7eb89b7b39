use crate::error::Result;

use super::{Any, dispatch::mismatch};

/// Storage of a nullable, separately owned value: a pointer field, a string
/// field or an array element.
pub trait Slot: Sized {
    fn as_dyn(&self) -> Option<&dyn Any>;
    fn into_dyn(self) -> Option<Box<dyn Any>>;
    fn from_dyn(value: Option<Box<dyn Any>>) -> Result<Self>;
}

impl<T: Any> Slot for Option<Box<T>> {
    fn as_dyn(&self) -> Option<&dyn Any> {
        self.as_deref().map(|value| value as &dyn Any)
    }

    fn into_dyn(self) -> Option<Box<dyn Any>> {
        self.map(|value| value as Box<dyn Any>)
    }

    fn from_dyn(value: Option<Box<dyn Any>>) -> Result<Self> {
        value
            .map(|value| value.downcast::<T>().map_err(|_| mismatch::<T>()))
            .transpose()
    }
}

// Strings are pointers already; no extra box around them.
impl Slot for Option<String> {
    fn as_dyn(&self) -> Option<&dyn Any> {
        self.as_ref().map(|value| value as &dyn Any)
    }

    fn into_dyn(self) -> Option<Box<dyn Any>> {
        self.map(|value| Box::new(value) as Box<dyn Any>)
    }

    fn from_dyn(value: Option<Box<dyn Any>>) -> Result<Self> {
        value
            .map(|value| value.downcast::<String>().map(|s| *s).map_err(|_| mismatch::<String>()))
            .transpose()
    }
}
