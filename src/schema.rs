//! Schema model handed over by the declaration extractor.
//!
//! A [`Record`] is read-only once constructed. The generator consumes it to
//! emit code, and the runtime registry keeps a copy per registered type so
//! that references between records can be checked before anything is
//! dispatched.
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

static FIELD_IDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field identifier pattern")
});

// `struct point`, `long long`, `Point`
static TYPE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*( [A-Za-z_][A-Za-z0-9_]*)*$").expect("type name pattern")
});

// ————————————————————————————————————————————————————————————————————————————
// PRIMITIVES
// ————————————————————————————————————————————————————————————————————————————

/// The closed set of built-in kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Char,
    Short,
    Int,
    Long,
    LongLong,
    Float,
    Double,
    Bool,
    String,
}

impl Primitive {
    pub const ALL: [Primitive; 9] = [
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::LongLong,
        Primitive::Float,
        Primitive::Double,
        Primitive::Bool,
        Primitive::String,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "char" => Some(Self::Char),
            "short" => Some(Self::Short),
            "int" => Some(Self::Int),
            "long" => Some(Self::Long),
            "long long" => Some(Self::LongLong),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            "bool" => Some(Self::Bool),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::LongLong => "long long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::String => "string",
        }
    }

    /// Storage type of the kind in Rust.
    pub fn rust_type(self) -> &'static str {
        match self {
            Self::Char => "i8",
            Self::Short => "i16",
            Self::Int => "i32",
            Self::Long | Self::LongLong => "i64",
            Self::Float => "f32",
            Self::Double => "f64",
            Self::Bool => "bool",
            Self::String => "String",
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    pub base_type: String,
    #[serde(default)]
    pub is_pointer: bool,
    /// Sequence of pointers to `base_type`; raw primitive arrays do not exist.
    #[serde(default)]
    pub is_array: bool,
}

/// Base type resolved once, instead of re-comparing strings on every use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef<'a> {
    Primitive(Primitive),
    Record(&'a str),
}

/// How a field is held by its containing record, which decides what the
/// generated code does with it in each of the three operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Array,
    /// Pointer fields and strings: separately heap-owned, may be null.
    Pointer,
    EmbeddedRecord,
    EmbeddedPrimitive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Primary name first, aliases after it.
    pub names: Vec<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// Records declared by one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub records: Vec<Record>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl FieldType {
    pub fn value(base_type: impl Into<String>) -> Self {
        Self { base_type: base_type.into(), is_pointer: false, is_array: false }
    }

    pub fn pointer(base_type: impl Into<String>) -> Self {
        Self { base_type: base_type.into(), is_pointer: true, is_array: false }
    }

    pub fn array(base_type: impl Into<String>) -> Self {
        Self { base_type: base_type.into(), is_pointer: false, is_array: true }
    }

    pub fn resolve(&self) -> TypeRef<'_> {
        match Primitive::from_name(&self.base_type) {
            Some(p) => TypeRef::Primitive(p),
            None => TypeRef::Record(&self.base_type),
        }
    }

    pub fn storage(&self) -> Storage {
        let resolved = self.resolve();
        if self.is_array {
            Storage::Array
        } else if self.is_pointer || resolved == TypeRef::Primitive(Primitive::String) {
            Storage::Pointer
        } else if matches!(resolved, TypeRef::Record(_)) {
            Storage::EmbeddedRecord
        } else {
            Storage::EmbeddedPrimitive
        }
    }
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self { name: name.into(), ty }
    }
}

impl Record {
    pub fn new<I, S>(names: I, fields: Vec<Field>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: names.into_iter().map(Into::into).collect(), fields }
    }

    pub fn primary_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.names.is_empty() {
            return Err(SchemaError::Unnamed);
        }
        let record = self.primary_name().to_owned();
        let mut names = HashSet::new();
        for name in &self.names {
            if name.is_empty() {
                return Err(SchemaError::EmptyName { record });
            }
            if !TYPE_NAME.is_match(name) {
                return Err(SchemaError::InvalidName(name.clone()));
            }
            if !names.insert(name.as_str()) {
                return Err(SchemaError::DuplicateName(name.clone()));
            }
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !FIELD_IDENT.is_match(&field.name) {
                return Err(SchemaError::InvalidFieldName { record, field: field.name.clone() });
            }
            if field.ty.base_type.trim().is_empty() {
                return Err(SchemaError::EmptyBaseType { record, field: field.name.clone() });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField { record, field: field.name.clone() });
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SCHEMA SET
// ————————————————————————————————————————————————————————————————————————————

/// Records indexed by every name they are known under.
#[derive(Debug, Default)]
pub struct SchemaSet<'a> {
    by_name: IndexMap<&'a str, &'a Record>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl<'a> SchemaSet<'a> {
    /// Validates each record and rejects names declared twice.
    pub fn new<I>(records: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut by_name = IndexMap::new();
        for record in records {
            record.validate()?;
            for name in &record.names {
                if Primitive::from_name(name).is_some() || by_name.contains_key(name.as_str()) {
                    return Err(SchemaError::DuplicateName(name.clone()));
                }
                by_name.insert(name.as_str(), record);
            }
        }
        Ok(Self { by_name })
    }

    pub fn get(&self, name: &str) -> Option<&'a Record> {
        self.by_name.get(name).copied()
    }

    /// Each record once, in declaration order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.by_name
            .iter()
            .filter(|&(&name, &record)| name == record.primary_name())
            .map(|(_, record)| *record)
    }

    /// `(record, referenced type)` for every reference no record here answers to.
    pub fn unresolved(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for record in self.records() {
            for field in &record.fields {
                if let TypeRef::Record(name) = field.ty.resolve() {
                    if self.get(name).is_none() {
                        out.push((record.primary_name().to_owned(), name.to_owned()));
                    }
                }
            }
        }
        out
    }

    pub fn check_resolved(&self) -> Result<(), SchemaError> {
        match self.unresolved().into_iter().next() {
            None => Ok(()),
            Some((record, name)) => Err(SchemaError::UnresolvedType { record, name }),
        }
    }

    /// Rejects records that contain themselves by value. Pointer and array
    /// fields are separately allocated and never form a cycle here.
    pub fn check_acyclic(&self) -> Result<(), SchemaError> {
        let mut marks = HashMap::new();
        for record in self.records() {
            self.visit(record, &mut marks)?;
        }
        Ok(())
    }

    fn visit(&self, record: &'a Record, marks: &mut HashMap<&'a str, Mark>) -> Result<(), SchemaError> {
        let key = record.primary_name();
        match marks.get(key) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(SchemaError::Cycle(key.to_owned())),
            None => {}
        }
        marks.insert(key, Mark::Visiting);
        for field in &record.fields {
            if field.ty.storage() != Storage::EmbeddedRecord {
                continue;
            }
            if let Some(target) = self.get(&field.ty.base_type) {
                self.visit(target, marks)?;
            }
        }
        marks.insert(key, Mark::Done);
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Record {
        Record::new(["Point"], vec![
            Field::new("x", FieldType::value("int")),
            Field::new("y", FieldType::value("int")),
        ])
    }

    #[test]
    fn storage_classification() {
        assert_eq!(FieldType::value("int").storage(), Storage::EmbeddedPrimitive);
        assert_eq!(FieldType::value("string").storage(), Storage::Pointer);
        assert_eq!(FieldType::pointer("int").storage(), Storage::Pointer);
        assert_eq!(FieldType::value("Point").storage(), Storage::EmbeddedRecord);
        assert_eq!(FieldType::pointer("Point").storage(), Storage::Pointer);
        assert_eq!(FieldType::array("string").storage(), Storage::Array);
        assert_eq!(FieldType::value("long long").resolve(), TypeRef::Primitive(Primitive::LongLong));
    }

    #[test]
    fn primitive_names_round_trip() {
        for p in Primitive::ALL {
            assert_eq!(Primitive::from_name(p.name()), Some(p));
        }
        assert_eq!(Primitive::from_name("Point"), None);
    }

    #[test]
    fn validate_rejects_bad_records() {
        assert!(matches!(Record::new(Vec::<String>::new(), vec![]).validate(), Err(SchemaError::Unnamed)));

        let dup = Record::new(["P"], vec![
            Field::new("x", FieldType::value("int")),
            Field::new("x", FieldType::value("int")),
        ]);
        assert!(matches!(dup.validate(), Err(SchemaError::DuplicateField { .. })));

        let bad = Record::new(["P"], vec![Field::new("not valid", FieldType::value("int"))]);
        assert!(matches!(bad.validate(), Err(SchemaError::InvalidFieldName { .. })));

        let spaced = Record::new(["struct point", "point_t"], vec![]);
        assert!(spaced.validate().is_ok());

        let repeated = Record::new(["A", "A"], vec![]);
        assert!(matches!(repeated.validate(), Err(SchemaError::DuplicateName(name)) if name == "A"));
    }

    #[test]
    fn schema_set_indexes_aliases_and_rejects_duplicates() {
        let a = Record::new(["struct point", "Point"], vec![]);
        let set = SchemaSet::new([&a]).unwrap();
        assert_eq!(set.get("Point").unwrap().primary_name(), "struct point");
        assert_eq!(set.records().count(), 1);

        let b = point();
        assert!(matches!(SchemaSet::new([&a, &b]), Err(SchemaError::DuplicateName(name)) if name == "Point"));

        let shadow = Record::new(["int"], vec![]);
        assert!(SchemaSet::new([&shadow]).is_err());
    }

    #[test]
    fn unresolved_references_are_listed() {
        let line = Record::new(["Line"], vec![
            Field::new("a", FieldType::pointer("Point")),
            Field::new("tags", FieldType::array("string")),
        ]);
        let set = SchemaSet::new([&line]).unwrap();
        assert_eq!(set.unresolved(), vec![("Line".to_owned(), "Point".to_owned())]);
        assert!(set.check_resolved().is_err());

        let p = point();
        let set = SchemaSet::new([&line, &p]).unwrap();
        assert!(set.check_resolved().is_ok());
    }

    #[test]
    fn by_value_cycles_are_rejected_pointer_cycles_are_not() {
        let node = Record::new(["Node"], vec![
            Field::new("next", FieldType::pointer("Node")),
            Field::new("children", FieldType::array("Node")),
        ]);
        assert!(SchemaSet::new([&node]).unwrap().check_acyclic().is_ok());

        let a = Record::new(["A"], vec![Field::new("b", FieldType::value("B"))]);
        let b = Record::new(["B"], vec![Field::new("a", FieldType::value("A"))]);
        let set = SchemaSet::new([&a, &b]).unwrap();
        assert!(matches!(set.check_acyclic(), Err(SchemaError::Cycle(_))));

        let selfish = Record::new(["S"], vec![Field::new("me", FieldType::value("S"))]);
        assert!(SchemaSet::new([&selfish]).unwrap().check_acyclic().is_err());
    }

    #[test]
    fn deserializes_extractor_output() {
        let src = r#"{
            "names": ["Line"],
            "fields": [
                {"name": "a", "type": {"base_type": "Point", "is_pointer": true}},
                {"name": "tags", "type": {"base_type": "string", "is_array": true}}
            ]
        }"#;
        let record: Record = serde_json::from_str(src).unwrap();
        assert_eq!(record.fields[0].ty, FieldType::pointer("Point"));
        assert_eq!(record.fields[1].ty, FieldType::array("string"));
    }
}
