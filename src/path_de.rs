//! Loading extractor output with JSON-path context in error messages.
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::SchemaError;
use crate::schema::{Record, SourceUnit};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, SchemaError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(path_error)
}

pub fn from_value_with_path<T: DeserializeOwned>(value: Value) -> Result<T, SchemaError> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(path_error)
}

fn path_error(err: serde_path_to_error::Error<serde_json::Error>) -> SchemaError {
    let path = err.path().to_string();
    SchemaError::Parse { path, source: err.into_inner() }
}

/// Accepts one unit object, an array of units, or a bare array of records
/// (which then form one unit named `source_name`). A unit without a name
/// takes `source_name` too.
pub fn load_units_from_str(source_name: &str, src: &str) -> Result<Vec<SourceUnit>, SchemaError> {
    let value: Value = from_str_with_path(src)?;
    let mut units = match value {
        Value::Array(items) if !items.is_empty() && items.iter().all(|x| x.get("records").is_some()) => {
            from_value_with_path::<Vec<SourceUnit>>(Value::Array(items))?
        }
        Value::Array(items) => {
            let records = from_value_with_path::<Vec<Record>>(Value::Array(items))?;
            vec![SourceUnit { name: String::new(), records }]
        }
        other => vec![from_value_with_path::<SourceUnit>(other)?],
    };
    for unit in &mut units {
        if unit.name.is_empty() {
            unit.name = source_name.to_owned();
        }
    }
    Ok(units)
}
