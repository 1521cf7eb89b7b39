//! Minimal CLI: schema → (check | rust)
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::info;

use crate::codegen::CodegenOptions;
use crate::path_de::load_units_from_str;
use crate::schema::{SchemaSet, SourceUnit};

/// Most input files accepted in one run.
pub const MAX_INPUTS: usize = 10;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate JSON marshal/unmarshal/free code from record schemas
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate schemas and list references to records not in the batch
    Check(CheckOut),
    /// emit Rust marshalling code for the schemas
    Rust(RustOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// Schema files (JSON emitted by the declaration extractor). May be
    /// literal paths or quoted glob patterns; standard input when omitted.
    #[arg(long, short, num_args = 1..)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// fail when a referenced record type is not declared in the batch
    #[arg(long)]
    strict: bool,
}

#[derive(clap::Parser, Debug)]
struct RustOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// crate path of the runtime as seen from the generated code
    #[arg(long, default_value = "json_marshal")]
    runtime_path: String,

    /// output .rs file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_units(&self) -> Result<Vec<SourceUnit>> {
        if self.input.is_empty() {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read schema from stdin")?;
            return Ok(load_units_from_str("stdin", &source)?);
        }

        let source_paths = resolve_file_path_patterns(&self.input)
            .map_err(|error| anyhow::anyhow!("failed to resolve input file paths: {error}"))?;
        if source_paths.len() > MAX_INPUTS {
            bail!("file limit reached: {} inputs given, at most {MAX_INPUTS} accepted", source_paths.len());
        }

        let mut units = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            let source_name = source_path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| source_path_str.clone());
            let loaded = load_units_from_str(&source_name, &source)
                .with_context(|| format!("failed to parse schema file ({source_path_str})"))?;
            info!("loaded {} unit(s) from {source_path_str}", loaded.len());
            units.extend(loaded);
        }
        Ok(units)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Check(target) => {
                let units = target.input_settings.load_units()?;
                let set = SchemaSet::new(units.iter().flat_map(|unit| unit.records.iter()))?;
                set.check_acyclic()?;
                let unresolved = set.unresolved();
                for (record, name) in &unresolved {
                    eprintln!("`{record}` references `{name}`, not declared in this batch");
                }
                if target.strict && !unresolved.is_empty() {
                    bail!("{} unresolved reference(s)", unresolved.len());
                }
                println!("{} record type(s) ok", set.records().count());
                Ok(())
            }
            Command::Rust(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let units = target.input_settings.load_units()?;
                let options = CodegenOptions { runtime_path: target.runtime_path.clone() };
                let rust_src = crate::codegen::generate(&units, &options)?;

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(out, &rust_src)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    println!("{rust_src}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                match entry {
                    Ok(p) => {
                        matched_any = true;
                        out.push(p);
                    }
                    Err(e) => return Err(Box::new(e)),
                }
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                return Err(format!("glob pattern matched no files: {pattern}").into());
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
