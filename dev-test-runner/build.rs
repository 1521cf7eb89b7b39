use std::path::PathBuf;

use anyhow::Context;
use json_marshal::codegen::{CodegenOptions, generate};
use json_marshal::path_de::load_units_from_str;

fn main() -> anyhow::Result<()> {
    let schema_path = "schemas/shapes.json";
    println!("cargo:rerun-if-changed={schema_path}");

    let source = std::fs::read_to_string(schema_path).with_context(|| format!("failed to read {schema_path}"))?;
    let units = load_units_from_str("shapes.json", &source)?;
    let rust_src = generate(&units, &CodegenOptions::default())?;

    let out = PathBuf::from(std::env::var("OUT_DIR")?).join("shapes.rs");
    std::fs::write(&out, rust_src).with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}
