//! Schema-driven JSON marshalling for statically declared record types.
//!
//! [`codegen`] turns record schemas into Rust source: a struct plus marshal,
//! unmarshal, free and register functions per record. The generated code
//! calls into [`runtime`], which owns the type registry and dispatches on
//! type names to the primitive codecs or to registered records.
pub mod cli;
pub mod codegen;
pub mod error;
pub mod path_de;
pub mod runtime;
pub mod schema;

pub use error::{Error, Result, SchemaError};
