//! Emits Rust source for a batch of record schemas.
//!
//! For every record the output holds a struct, `marshal_<name>`,
//! `unmarshal_<name>`, `free_<name>` and `register_<name>`; one
//! `register_all` at the end registers the whole batch. The generated code
//! only talks to the runtime through `<runtime_path>::runtime`.
use indexmap::IndexMap;
use log::debug;

use crate::error::SchemaError;
use crate::schema::{FieldType, Record, SchemaSet, SourceUnit, Storage, TypeRef};

pub mod naming;

use naming::{field_ident, fn_suffix, type_ident};

const BATCH_SUFFIX: &str = "all";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct CodegenOptions {
    /// Crate path the generated `use` refers to (`crate` when generating
    /// into the runtime crate itself).
    pub runtime_path: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self { runtime_path: "json_marshal".to_owned() }
    }
}

pub struct Codegen {
    options: CodegenOptions,
    out: String,
    /// Every declared name or alias → struct identifier of its record.
    idents: IndexMap<String, String>,
    registered: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

/// Validates the batch and renders it into one source file.
pub fn generate(units: &[SourceUnit], options: &CodegenOptions) -> Result<String, SchemaError> {
    let mut cg = Codegen::new(options.clone());
    cg.prepare(units)?;
    cg.emit_preamble(units);
    for unit in units {
        cg.emit_unit(unit);
    }
    cg.emit_register_all();
    Ok(cg.into_string())
}

impl Codegen {
    pub fn new(options: CodegenOptions) -> Self {
        Self {
            options,
            out: String::new(),
            idents: IndexMap::new(),
            registered: Vec::new(),
        }
    }

    /// Checks the batch as a whole: names unique across units, no by-value
    /// cycles, no two records mapping onto the same Rust identifiers.
    /// References to records outside the batch are allowed; they must be
    /// registered by other generated code before the registry is built.
    pub fn prepare(&mut self, units: &[SourceUnit]) -> Result<(), SchemaError> {
        let set = SchemaSet::new(units.iter().flat_map(|unit| unit.records.iter()))?;
        set.check_acyclic()?;

        let mut owners: IndexMap<String, &Record> = IndexMap::new();
        for record in set.records() {
            let ident = type_ident(record.primary_name());
            let suffix = fn_suffix(record.primary_name());
            // `register_all` is taken by the batch routine
            if suffix == BATCH_SUFFIX {
                return Err(SchemaError::IdentCollision {
                    first: format!("register_{BATCH_SUFFIX}"),
                    second: record.primary_name().to_owned(),
                    ident: format!("fn {suffix}"),
                });
            }
            for key in [ident.clone(), format!("fn {suffix}")] {
                if let Some(first) = owners.get(&key) {
                    return Err(SchemaError::IdentCollision {
                        first: first.primary_name().to_owned(),
                        second: record.primary_name().to_owned(),
                        ident: key,
                    });
                }
                owners.insert(key, record);
            }
            for name in &record.names {
                self.idents.insert(name.clone(), ident.clone());
            }
        }
        Ok(())
    }

    pub fn emit_preamble(&mut self, units: &[SourceUnit]) {
        let sources = units.iter().map(|u| u.name.as_str()).collect::<Vec<_>>().join(", ");
        self.line(format!("// Generated by json-marshal from: {sources}"));
        self.line("// Do not edit by hand.");
        self.line("");
        self.line("#[allow(unused_imports)]");
        self.line(format!("use {}::runtime::{{self as rt, Slot as _}};", self.options.runtime_path));
        self.line("");
    }

    pub fn emit_unit(&mut self, unit: &SourceUnit) {
        debug!("emit {} record(s) from `{}`", unit.records.len(), unit.name);
        self.line(format!("// file: {}", unit.name));
        self.line("");
        for record in &unit.records {
            self.emit_record(record);
        }
    }

    pub fn emit_register_all(&mut self) {
        self.line(format!("pub fn register_{BATCH_SUFFIX}(builder: &mut rt::RegistryBuilder) -> rt::Result<()> {{"));
        for suffix in std::mem::take(&mut self.registered) {
            self.line(format!("    register_{suffix}(builder)?;"));
        }
        self.line("    Ok(())");
        self.line("}");
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PER RECORD
// ————————————————————————————————————————————————————————————————————————————

impl Codegen {
    fn emit_record(&mut self, record: &Record) {
        let name = record.primary_name();
        let ident = self.record_ident(name);
        let suffix = fn_suffix(name);
        debug!("emit record `{name}` as `{ident}`");

        self.line(format!("// record: {name}"));
        self.line("");
        self.emit_struct(record, &ident);
        self.emit_marshal(record, &ident, &suffix);
        self.emit_unmarshal(record, &ident, &suffix);
        self.emit_free(record, &ident, &suffix);
        self.emit_register(record, &ident, &suffix);
        self.registered.push(suffix);
    }

    fn emit_struct(&mut self, record: &Record, ident: &str) {
        self.line("#[derive(Debug, Clone, Default, PartialEq)]");
        self.line(format!("pub struct {ident} {{"));
        for field in &record.fields {
            let ty = self.rust_type(&field.ty);
            self.line(format!("    pub {}: {ty},", field_ident(&field.name)));
        }
        self.line("}");
        self.line("");
    }

    fn emit_marshal(&mut self, record: &Record, ident: &str, suffix: &str) {
        let registry = if record.fields.is_empty() { "_registry" } else { "registry" };
        self.line(format!(
            "pub fn marshal_{suffix}({registry}: &rt::Registry, value: Option<&dyn rt::Any>) -> rt::Result<rt::Value> {{"
        ));
        self.line("    let Some(value) = value else {");
        self.line("        return Ok(rt::Value::Null);");
        self.line("    };");
        if record.fields.is_empty() {
            self.line(format!("    rt::downcast::<{ident}>(value)?;"));
            self.line("    Ok(rt::Value::Object(rt::Map::new()))");
            self.line("}");
            self.line("");
            return;
        }
        self.line(format!("    let d = rt::downcast::<{ident}>(value)?;"));
        self.line("    let mut object = rt::Map::new();");
        for field in &record.fields {
            let access = format!("d.{}", field_ident(&field.name));
            let base = &field.ty.base_type;
            let value = match field.ty.storage() {
                Storage::Array => format!("rt::marshal_array_value(registry, {base:?}, {access}.as_deref())?"),
                Storage::Pointer => format!("rt::marshal_value(registry, {base:?}, {access}.as_dyn())?"),
                Storage::EmbeddedRecord | Storage::EmbeddedPrimitive => {
                    format!("rt::marshal_value(registry, {base:?}, Some(&{access} as &dyn rt::Any))?")
                }
            };
            self.line(format!("    object.insert({:?}.to_owned(), {value});", field.name));
        }
        self.line("    Ok(rt::Value::Object(object))");
        self.line("}");
        self.line("");
    }

    fn emit_unmarshal(&mut self, record: &Record, ident: &str, suffix: &str) {
        let registry = if record.fields.is_empty() { "_registry" } else { "registry" };
        self.line(format!(
            "pub fn unmarshal_{suffix}({registry}: &rt::Registry, value: &rt::Value) -> rt::Result<Option<Box<dyn rt::Any>>> {{"
        ));
        if record.fields.is_empty() {
            self.line(format!("    rt::expect_object(value, {:?})?;", record.primary_name()));
            self.line(format!("    Ok(Some(Box::new({ident}::default()) as Box<dyn rt::Any>))"));
            self.line("}");
            self.line("");
            return;
        }
        self.line(format!("    let object = rt::expect_object(value, {:?})?;", record.primary_name()));
        self.line(format!("    let mut d = {ident}::default();"));
        for field in &record.fields {
            let target = format!("d.{}", field_ident(&field.name));
            let base = &field.ty.base_type;
            let key = &field.name;
            let call = match field.ty.storage() {
                Storage::Array => "unmarshal_array_field",
                Storage::Pointer => "unmarshal_slot",
                Storage::EmbeddedRecord | Storage::EmbeddedPrimitive => "unmarshal_required",
            };
            self.line(format!("    {target} = rt::{call}(registry, {base:?}, object, {key:?})?;"));
        }
        self.line("    Ok(Some(Box::new(d) as Box<dyn rt::Any>))");
        self.line("}");
        self.line("");
    }

    /// Releases what the record owns. Its own storage is released by
    /// whoever owns it: `rt::free_value` for a boxed record, the parent for
    /// an embedded one.
    fn emit_free(&mut self, record: &Record, ident: &str, suffix: &str) {
        let mut body = Vec::new();
        for field in &record.fields {
            let access = format!("d.{}", field_ident(&field.name));
            let base = &field.ty.base_type;
            match field.ty.storage() {
                Storage::Array => {
                    body.push(format!("    rt::free_array(registry, {base:?}, {access}.take())?;"));
                }
                Storage::Pointer => {
                    body.push(format!("    rt::free_value(registry, {base:?}, {access}.take().into_dyn())?;"));
                }
                Storage::EmbeddedRecord => {
                    body.push(format!(
                        "    rt::release_value(registry, {base:?}, Some(&mut {access} as &mut dyn rt::Any))?;"
                    ));
                }
                // part of the record's own storage
                Storage::EmbeddedPrimitive => {}
            }
        }

        let registry = if body.is_empty() { "_registry" } else { "registry" };
        self.line(format!(
            "pub fn free_{suffix}({registry}: &rt::Registry, value: &mut dyn rt::Any) -> rt::Result<()> {{"
        ));
        if body.is_empty() {
            self.line(format!("    rt::downcast_mut::<{ident}>(value)?;"));
        } else {
            self.line(format!("    let d = rt::downcast_mut::<{ident}>(value)?;"));
            for line in body {
                self.line(line);
            }
        }
        self.line("    Ok(())");
        self.line("}");
        self.line("");
    }

    fn emit_register(&mut self, record: &Record, ident: &str, suffix: &str) {
        let names = record.names.iter().map(|n| format!("{n:?}")).collect::<Vec<_>>().join(", ");
        self.line(format!("pub fn register_{suffix}(builder: &mut rt::RegistryBuilder) -> rt::Result<()> {{"));
        self.line("    builder.register(");
        if record.fields.is_empty() {
            self.line(format!("        rt::Record::new([{names}], vec![]),"));
        } else {
            self.line(format!("        rt::Record::new([{names}], vec!["));
            for field in &record.fields {
                self.line(format!(
                    "            rt::Field::new({:?}, {}),",
                    field.name,
                    field_type_expr(&field.ty)
                ));
            }
            self.line("        ]),");
        }
        self.line(format!("        std::mem::size_of::<{ident}>(),"));
        self.line(format!("        marshal_{suffix},"));
        self.line(format!("        unmarshal_{suffix},"));
        self.line(format!("        free_{suffix},"));
        self.line("    )");
        self.line("}");
        self.line("");
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

impl Codegen {
    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn record_ident(&self, name: &str) -> String {
        self.idents.get(name).cloned().unwrap_or_else(|| type_ident(name))
    }

    /// Type of the value a pointer or array slot points at.
    fn pointee(&self, ty: &FieldType) -> String {
        match ty.resolve() {
            TypeRef::Primitive(p) => p.rust_type().to_owned(),
            TypeRef::Record(name) => self.record_ident(name),
        }
    }

    fn slot_type(&self, ty: &FieldType) -> String {
        match ty.resolve() {
            TypeRef::Primitive(crate::schema::Primitive::String) => "Option<String>".to_owned(),
            _ => format!("Option<Box<{}>>", self.pointee(ty)),
        }
    }

    fn rust_type(&self, ty: &FieldType) -> String {
        match ty.storage() {
            Storage::Array => format!("Option<Vec<{}>>", self.slot_type(ty)),
            Storage::Pointer => self.slot_type(ty),
            Storage::EmbeddedRecord | Storage::EmbeddedPrimitive => self.pointee(ty),
        }
    }
}

fn field_type_expr(ty: &FieldType) -> String {
    let base = &ty.base_type;
    match (ty.is_pointer, ty.is_array) {
        (false, false) => format!("rt::FieldType::value({base:?})"),
        (true, false) => format!("rt::FieldType::pointer({base:?})"),
        (false, true) => format!("rt::FieldType::array({base:?})"),
        (true, true) => format!(
            "rt::FieldType {{ base_type: {base:?}.to_owned(), is_pointer: true, is_array: true }}"
        ),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
