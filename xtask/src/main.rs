//! Developer tasks (schema generation, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(PathBuf::from)
        .unwrap_or(manifest_dir)
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(reftrim_types::ReftrimReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(reftrim_settings::ReftrimConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "reftrim.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "reftrim.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Check that schemas/ matches what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut stale = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        let expected = serialize_schema(&(spec.generate)())?;
        match fs::read_to_string(&path) {
            Ok(actual) if actual == expected => {}
            Ok(_) => stale.push(format!("{} (out of date)", spec.filename)),
            Err(_) => stale.push(format!("{} (missing)", spec.filename)),
        }
    }

    if stale.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &stale {
        eprintln!("  - {}", name);
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Validate that all check IDs and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let check_ids = reftrim_types::explain::all_check_ids();
    let codes = reftrim_types::explain::all_codes();

    let mut errors = Vec::new();
    for (kind, id) in check_ids
        .iter()
        .map(|id| ("Check ID", id))
        .chain(codes.iter().map(|code| ("Code", code)))
    {
        match reftrim_types::explain::lookup_explanation(id) {
            Some(exp) => {
                for (field, value) in [
                    ("title", exp.title),
                    ("description", exp.description),
                    ("remediation", exp.remediation),
                ] {
                    if value.is_empty() {
                        errors.push(format!("{kind} '{id}' has empty {field}"));
                    }
                }
            }
            None => errors.push(format!("{kind} '{id}' has no explanation")),
        }
    }

    if errors.is_empty() {
        println!("{} check IDs have explanations", check_ids.len());
        println!("{} codes have explanations", codes.len());
        return Ok(());
    }
    for error in &errors {
        eprintln!("  - {}", error);
    }
    bail!("Explain coverage validation failed with {} errors", errors.len())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  explain-coverage  Validate all check IDs and codes have explanations");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
