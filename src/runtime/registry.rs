use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::error::{Error, Result, SchemaError};
use crate::schema::{Primitive, Record, SchemaSet};

use super::Any;

pub type MarshalFn = fn(&Registry, Option<&dyn Any>) -> Result<Value>;
pub type UnmarshalFn = fn(&Registry, &Value) -> Result<Option<Box<dyn Any>>>;
/// Releases the heap data a record owns, leaving its own storage alone.
pub type ReleaseFn = fn(&Registry, &mut dyn Any) -> Result<()>;

/// One name a record type answers to. Aliases get their own entry sharing
/// the schema and the functions.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub name: String,
    pub size: usize,
    pub schema: Arc<Record>,
    pub marshal: MarshalFn,
    pub unmarshal: UnmarshalFn,
    pub release: ReleaseFn,
}

/// Collects registrations in any order; references between records are only
/// checked by [`RegistryBuilder::build`].
#[derive(Debug, Default, Clone)]
pub struct RegistryBuilder {
    entries: IndexMap<String, RegistryEntry>,
}

/// Read-only after construction, so dispatch can run from many threads.
#[derive(Debug, Default)]
pub struct Registry {
    entries: IndexMap<String, RegistryEntry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `record` under its primary name and every alias. Nothing is
    /// added when any of the names is already taken.
    pub fn register(
        &mut self,
        record: Record,
        size: usize,
        marshal: MarshalFn,
        unmarshal: UnmarshalFn,
        release: ReleaseFn,
    ) -> Result<()> {
        record.validate().map_err(|err| match err {
            SchemaError::DuplicateName(name) => Error::DuplicateType(name),
            other => Error::Schema(other),
        })?;
        for name in &record.names {
            if self.entries.contains_key(name) || Primitive::from_name(name).is_some() {
                return Err(Error::DuplicateType(name.clone()));
            }
        }
        let schema = Arc::new(record);
        for name in &schema.names {
            debug!("register `{name}` ({size} bytes)");
            self.entries.insert(name.clone(), RegistryEntry {
                name: name.clone(),
                size,
                schema: Arc::clone(&schema),
                marshal,
                unmarshal,
                release,
            });
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Freezes the registry. Every record referenced by a registered field
    /// must itself be registered, and no record may contain itself by value.
    pub fn build(self) -> Result<Registry> {
        {
            let set = SchemaSet::new(
                self.entries
                    .values()
                    .filter(|entry| entry.name == entry.schema.primary_name())
                    .map(|entry| entry.schema.as_ref()),
            )?;
            set.check_resolved().map_err(|err| match err {
                SchemaError::UnresolvedType { name, .. } => Error::UnknownType(name),
                other => Error::Schema(other),
            })?;
            set.check_acyclic().map_err(|err| match err {
                SchemaError::Cycle(name) => Error::CyclicType(name),
                other => Error::Schema(other),
            })?;
        }
        debug!("registry frozen with {} names", self.entries.len());
        Ok(Registry { entries: self.entries })
    }
}

impl Registry {
    pub fn lookup(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&RegistryEntry> {
        self.lookup(name).ok_or_else(|| Error::UnknownType(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
