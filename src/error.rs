//! Error types shared by the schema model, the runtime and the generator.
use thiserror::Error;

/// Problems with a schema as handed over by the extractor.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("record has no names")]
    Unnamed,
    #[error("record `{record}`: empty name")]
    EmptyName { record: String },
    #[error("`{0}` is not a valid type name")]
    InvalidName(String),
    #[error("record `{record}`: duplicate field `{field}`")]
    DuplicateField { record: String, field: String },
    #[error("record `{record}`: `{field}` is not a valid field identifier")]
    InvalidFieldName { record: String, field: String },
    #[error("record `{record}`: field `{field}` has an empty base type")]
    EmptyBaseType { record: String, field: String },
    #[error("type name `{0}` declared more than once")]
    DuplicateName(String),
    #[error("record `{record}` references unknown type `{name}`")]
    UnresolvedType { record: String, name: String },
    #[error("record `{0}` contains itself by value")]
    Cycle(String),
    #[error("record `{first}` and `{second}` both generate the identifier `{ident}`")]
    IdentCollision { first: String, second: String, ident: String },
    #[error("at JSON path {path} → {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime errors. The first group corresponds to configuration mistakes
/// that the registry reports while it is being built; the rest are the
/// recoverable failures of marshal and unmarshal.
#[derive(Debug, Error)]
pub enum Error {
    #[error("marshaller for name `{0}` already present")]
    DuplicateType(String),
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("record `{0}` contains itself by value")]
    CyclicType(String),
    #[error("registry is already frozen, cannot register `{0}`")]
    Frozen(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("value is not a `{expected}`")]
    TypeMismatch { expected: String },
    #[error("invalid input for `{0}`")]
    InvalidInput(String),
    #[error("non-finite number for `{0}`")]
    NonFiniteNumber(String),
    #[error("top-level array passed to scalar unmarshal")]
    UnexpectedArray,
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
