use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, WrapErr};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use letterpack::config::schema;
use letterpack::effective::{EffectiveLayout, honorific_size};
use letterpack::render::svg::to_svg;
use letterpack::{
    AddressRecord, LabelPair, LayoutConfig, LayoutMode, Page, render, render_batch, resolve,
    set_override,
};

#[derive(Parser, Debug)]
#[command(name = "letterpack", version, about = "Letter Pack address label layout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lay out one label, or a batch of them, and print the drawing
    /// instructions or an SVG preview
    Render(RenderArgs),
    /// Resolve a configuration file and print the effective values
    Check {
        file: PathBuf,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Print the built-in default configuration as YAML
    Defaults,
}

#[derive(Args, Debug)]
struct OverrideArgs {
    /// Override one field, e.g. `--set fonts.name=16` (repeatable)
    #[arg(long = "set", value_name = "GROUP.FIELD=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, Value)>,
}

impl OverrideArgs {
    fn to_value(&self) -> Option<Value> {
        if self.set.is_empty() {
            return None;
        }
        let mut overrides = Value::Null;
        for (path, value) in &self.set {
            set_override(&mut overrides, path, value.clone());
        }
        Some(overrides)
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(long, value_name = "NNN-NNNN", required_unless_present = "batch")]
    to_postal: Option<String>,
    /// Recipient address line (repeatable)
    #[arg(long, required_unless_present = "batch")]
    to_address: Vec<String>,
    #[arg(long, required_unless_present = "batch")]
    to_name: Option<String>,
    #[arg(long)]
    to_phone: Option<String>,
    #[arg(long, default_value = "様")]
    to_honorific: String,

    #[arg(long, value_name = "NNN-NNNN", required_unless_present = "batch")]
    from_postal: Option<String>,
    /// Sender address line (repeatable)
    #[arg(long, required_unless_present = "batch")]
    from_address: Vec<String>,
    #[arg(long, required_unless_present = "batch")]
    from_name: Option<String>,
    #[arg(long)]
    from_phone: Option<String>,
    #[arg(long)]
    from_honorific: Option<String>,

    /// YAML list of `{to, from}` address pairs, rendered one label each
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = [
            "to_postal", "to_address", "to_name", "from_postal", "from_address", "from_name",
        ]
    )]
    batch: Option<PathBuf>,

    /// Layout configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(flatten)]
    overrides: OverrideArgs,
    /// Page placement; defaults to `layout.layout_mode` from the configuration
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    /// Output file; stdout when omitted. Multi-page SVG is written as
    /// `<stem>-1.svg`, `<stem>-2.svg`, ...
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Center,
    #[value(name = "grid-4up", alias = "grid_4up")]
    Grid4Up,
}

impl From<ModeArg> for LayoutMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Center => LayoutMode::Center,
            ModeArg::Grid4Up => LayoutMode::Grid4Up,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Svg,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the rendered output
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => render_command(args),
        Commands::Check { file, overrides } => check_command(&file, &overrides),
        Commands::Defaults => {
            let yaml = serde_yaml::to_string(&LayoutConfig::default()).into_diagnostic()?;
            print!("{yaml}");
            Ok(())
        }
    }
}

fn render_command(args: RenderArgs) -> Result<()> {
    let overrides = args.overrides.to_value();
    let config = resolve(args.config.as_deref(), overrides.as_ref())?;
    let mode = args.mode.map(LayoutMode::from).unwrap_or(config.layout.layout_mode);

    let pages = match &args.batch {
        Some(path) => {
            let pairs = read_batch(path)?;
            if pairs.is_empty() {
                tracing::warn!(path = %path.display(), "batch file lists no labels");
            }
            render_batch(&pairs, &config, mode)
        }
        None => {
            let (to, from) = single_pair(&args)?;
            vec![render(&to, &from, &config, mode)]
        }
    };

    match args.format {
        Format::Json => {
            let mut json = match pages.as_slice() {
                [page] if args.batch.is_none() => serde_json::to_string_pretty(page),
                pages => serde_json::to_string_pretty(pages),
            }
            .into_diagnostic()?;
            json.push('\n');
            emit(args.output.as_deref(), &json)
        }
        Format::Svg => write_svg(args.output.as_deref(), &pages),
    }
}

/// The label described by the `--to-*` and `--from-*` flags
fn single_pair(args: &RenderArgs) -> Result<(AddressRecord, AddressRecord)> {
    let to_postal = args.to_postal.as_deref().unwrap_or_default();
    let to_name = args.to_name.as_deref().unwrap_or_default();
    let mut to = AddressRecord::new(to_postal, &args.to_address, to_name)
        .wrap_err("invalid recipient (--to-*)")?
        .with_honorific(&args.to_honorific);
    if let Some(phone) = &args.to_phone {
        to = to.with_phone(phone);
    }

    let from_postal = args.from_postal.as_deref().unwrap_or_default();
    let from_name = args.from_name.as_deref().unwrap_or_default();
    let mut from = AddressRecord::new(from_postal, &args.from_address, from_name)
        .wrap_err("invalid sender (--from-*)")?;
    if let Some(phone) = &args.from_phone {
        from = from.with_phone(phone);
    }
    if let Some(honorific) = &args.from_honorific {
        from = from.with_honorific(honorific);
    }
    Ok((to, from))
}

fn read_batch(path: &Path) -> Result<Vec<(AddressRecord, AddressRecord)>> {
    let text = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read batch file {}", path.display()))?;
    parse_batch(&text).wrap_err_with(|| format!("invalid batch file {}", path.display()))
}

fn parse_batch(text: &str) -> Result<Vec<(AddressRecord, AddressRecord)>> {
    let pairs: Vec<LabelPair> = serde_yaml::from_str(text).into_diagnostic()?;
    Ok(pairs.into_iter().map(Into::into).collect())
}

/// One standalone document per page. Several pages need an output file to
/// number, since concatenated `<svg>` roots are not a valid document.
fn write_svg(output: Option<&Path>, pages: &[Page]) -> Result<()> {
    let documents = to_svg(pages).into_diagnostic()?;
    match (output, documents.as_slice()) {
        (output, [document]) => emit(output, document),
        (None, []) => Ok(()),
        (None, _) => miette::bail!(
            "{} pages of SVG cannot go to stdout; pass --output to write one file per page",
            documents.len()
        ),
        (Some(path), documents) => {
            for (index, document) in documents.iter().enumerate() {
                emit(Some(&page_path(path, index)), document)?;
            }
            Ok(())
        }
    }
}

/// `labels.svg` becomes `labels-1.svg`, `labels-2.svg`, ...
fn page_path(path: &Path, index: usize) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let extension = path.extension().map_or(Cow::Borrowed("svg"), |e| e.to_string_lossy());
    path.with_file_name(format!("{stem}-{}.{extension}", index + 1))
}

fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot write {}", path.display())),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn check_command(file: &Path, overrides: &OverrideArgs) -> Result<()> {
    let overrides = overrides.to_value();
    let config = resolve(Some(file), overrides.as_ref())?;
    let effective = EffectiveLayout::resolve(&config);

    let report = json!({
        "configuration": config,
        "effective": {
            "honorific_size": honorific_size(&config.fonts),
            "from_section": {
                "caption_size": effective.from.caption_size,
                "postal_code_size": effective.from.postal_code_size,
                "address_size": effective.from.address_size,
                "name_size": effective.from.name_size,
                "honorific_size": effective.from.honorific_size,
                "phone_size": effective.from.phone_size,
                "address_line_height": effective.from.address_line_height,
            },
        },
    });
    let yaml = serde_yaml::to_string(&report).into_diagnostic()?;
    eprintln!("{}: ok", file.display());
    print!("{yaml}");
    Ok(())
}

/// `RUST_LOG` as given (`debug` means debug everywhere), or `warn` when it is
/// unset or unparsable
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Parse `group.field=value`. The value is read as YAML, so `16`, `true`,
/// `null` and `grid_4up` all get their natural types.
fn parse_assignment(s: &str) -> std::result::Result<(String, Value), String> {
    let (path, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected GROUP.FIELD=VALUE, got {s:?}"))?;
    let path = path.trim();
    if schema::field(path).is_none() {
        return Err(format!("unknown configuration field `{path}`"));
    }
    let value = serde_yaml::from_str::<Value>(raw.trim())
        .unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((path.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_files_list_label_pairs() {
        let pairs = parse_batch(
            r#"
- to:
    postal_code: 100-0001
    address_lines: [東京都千代田区千代田1-1]
    name: 山田太郎
    honorific: 様
  from:
    postal_code: 530-0001
    address_lines: [大阪府大阪市北区梅田1-1]
    name: 佐藤花子
    phone: 06-1234-5678
"#,
        )
        .unwrap();
        assert_eq!(pairs.len(), 1);
        let (to, from) = &pairs[0];
        assert_eq!(to.honorific.as_deref(), Some("様"));
        assert_eq!(from.phone.as_deref(), Some("06-1234-5678"));
        assert_eq!(from.postal_code.to_string(), "530-0001");
    }

    #[test]
    fn batch_records_are_checked() {
        let err = parse_batch(
            r#"
- to: { postal_code: "1000001", address_lines: [東京都], name: 山田太郎 }
  from: { postal_code: 530-0001, address_lines: [大阪府], name: 佐藤花子 }
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("1000001"), "{err}");
        assert!(parse_batch("[]").unwrap().is_empty());
    }

    #[test]
    fn rust_log_is_taken_as_written() {
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
        assert_eq!(log_filter(Some("letterpack=trace")).to_string(), "letterpack=trace");
        assert_eq!(log_filter(None).to_string(), "warn");
    }

    #[test]
    fn svg_pages_are_numbered_files() {
        assert_eq!(page_path(Path::new("out/labels.svg"), 0), Path::new("out/labels-1.svg"));
        assert_eq!(page_path(Path::new("labels"), 2), Path::new("labels-3.svg"));
    }

    #[test]
    fn cli_accepts_a_batch_without_single_label_flags() {
        let cli = Cli::try_parse_from(["letterpack", "render", "--batch", "pairs.yaml"]).unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.batch.as_deref(), Some(Path::new("pairs.yaml")));

        assert!(Cli::try_parse_from(["letterpack", "render"]).is_err());
        assert!(
            Cli::try_parse_from(["letterpack", "render", "--batch", "p.yaml", "--to-name", "x"])
                .is_err()
        );
    }
}
