use std::fmt::Write as _;
use std::fs;
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use letterpack::LayoutConfig;
use letterpack::config::schema::{FIELDS, FieldSpec, GROUPS};
use serde_json::Value;

const SAMPLE_CONFIG: &str = "config/label_layout.yaml";
const REFERENCE_DOC: &str = "docs/configuration.md";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  config-docs [--check]    Regenerate the sample config and its reference");
        return ExitCode::FAILURE;
    }

    let result = match args[1].as_str() {
        "config-docs" => config_docs(args[2..].iter().any(|a| a == "--check")),
        _ => Err(format!("Unknown command: {}", args[1])),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn config_docs(check: bool) -> Result<(), String> {
    let root = workspace_root()?;
    let defaults = serde_json::to_value(LayoutConfig::default()).map_err(|e| e.to_string())?;

    let outputs = [
        (root.join(SAMPLE_CONFIG), sample_config(&defaults)),
        (root.join(REFERENCE_DOC), reference_doc(&defaults)),
    ];

    let mut stale = Vec::new();
    for (path, contents) in &outputs {
        let current = fs::read_to_string(path).unwrap_or_default();
        if current == *contents {
            continue;
        }
        if check {
            stale.push(path.as_str().to_string());
            continue;
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| format!("cannot create {dir}: {e}"))?;
        }
        fs::write(path, contents).map_err(|e| format!("cannot write {path}: {e}"))?;
        println!("wrote {path}");
    }

    if !stale.is_empty() {
        return Err(format!(
            "out of date (run `cargo xtask config-docs`):\n  {}",
            stale.join("\n  ")
        ));
    }
    Ok(())
}

fn workspace_root() -> Result<Utf8PathBuf, String> {
    Utf8Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Utf8Path::to_path_buf)
        .ok_or_else(|| "xtask must live inside the workspace".to_string())
}

fn fields_of(group: &str) -> impl Iterator<Item = &'static FieldSpec> + '_ {
    FIELDS.iter().filter(move |f| f.group == group)
}

fn default_of<'a>(defaults: &'a Value, spec: &FieldSpec) -> &'a Value {
    &defaults[spec.group][spec.name]
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Range with its unit, e.g. `mm, 50..=210`
fn range_note(spec: &FieldSpec) -> String {
    match spec.unit.suffix() {
        "" => spec.kind.range(),
        unit => format!("{unit}, {}", spec.kind.range()),
    }
}

fn sample_config(defaults: &Value) -> String {
    let mut out = String::new();
    out.push_str("# Letter Pack label layout\n");
    out.push_str("#\n");
    out.push_str("# Generated by `cargo xtask config-docs` from src/config/schema.rs.\n");
    out.push_str("# Every value below is the built-in default; delete any line to keep it.\n");

    for (group, title) in GROUPS {
        let _ = writeln!(out);
        let _ = writeln!(out, "# {title}");
        let _ = writeln!(out, "{group}:");
        for spec in fields_of(group) {
            let _ = writeln!(out, "  # {} ({})", spec.description, range_note(spec));
            let _ = writeln!(out, "  {}: {}", spec.name, scalar(default_of(defaults, spec)));
        }
    }
    out
}

fn reference_doc(defaults: &Value) -> String {
    let mut out = String::new();
    out.push_str("# Configuration reference\n\n");
    out.push_str("<!-- Generated by `cargo xtask config-docs`; do not edit by hand. -->\n\n");
    out.push_str(
        "Label layout is read from a YAML file grouped by section. Every field is optional;\n\
         missing fields take the defaults below. Values outside their range are rejected, and\n\
         `section_height.to_section_height + section_height.from_section_height` must equal\n\
         `layout.label_height`. `fonts.address + section_height.from_address_font_size_adjust`\n\
         must be at least 1.\n",
    );

    for (group, title) in GROUPS {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {title} (`{group}`)");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Field | Type | Unit | Default | Range | Description |");
        let _ = writeln!(out, "|-------|------|------|---------|-------|-------------|");
        for spec in fields_of(group) {
            let unit = match spec.unit.suffix() {
                "" => "-",
                unit => unit,
            };
            let _ = writeln!(
                out,
                "| `{}` | {} | {} | `{}` | {} | {} |",
                spec.name,
                spec.kind.type_name().replace('|', "\\|"),
                unit,
                scalar(default_of(defaults, spec)),
                spec.kind.range().replace('|', "\\|"),
                spec.description,
            );
        }
    }
    out
}
