use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use xmljson::ConvertOptions;

#[derive(Debug, Parser)]
#[command(
    name = "xml2json",
    version,
    about = "Converts XML to JSON or the other way around",
    arg_required_else_help = true
)]
struct Args {
    /// Input file
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Conversion direction (inferred from the input extension when omitted)
    #[arg(short = 't', long = "type", value_enum)]
    direction: Option<Direction>,
    /// Write to OUT instead of stdout
    #[arg(short, long, value_name = "OUT")]
    out: Option<PathBuf>,
    /// Trim whitespace around text and tails when converting XML to JSON
    #[arg(long)]
    strip: bool,
    /// Indent JSON output
    #[arg(long)]
    pretty: bool,
    /// Prefix XML output with an XML declaration
    #[arg(long)]
    declaration: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Direction {
    #[value(name = "xml2json")]
    XmlToJson,
    #[value(name = "json2xml")]
    JsonToXml,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if !args.input.is_file() {
        bail!("input file {} does not exist", args.input.display());
    }

    let input = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input file {}", args.input.display()))?;
    let direction = args
        .direction
        .or_else(|| infer_direction(&args.input))
        .unwrap_or(Direction::JsonToXml);
    debug!(?direction, "converting {}", args.input.display());

    let options = ConvertOptions::new(args.strip)
        .with_pretty(args.pretty)
        .with_xml_declaration(args.declaration);
    let output = match direction {
        Direction::XmlToJson => xmljson::xml_to_json_with_options(&input, &options),
        Direction::JsonToXml => xmljson::json_to_xml_with_options(&input, &options),
    }
    .with_context(|| format!("failed to convert {}", args.input.display()))?;

    write_output(args.out.as_deref(), &output)
}

fn write_output(path: Option<&Path>, data: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, data)
                .with_context(|| format!("failed to write output file {}", path.display()))?;
            info!("wrote {}", path.display());
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{data}").context("failed to write stdout")?;
            Ok(())
        }
    }
}

fn infer_direction(path: &Path) -> Option<Direction> {
    let ext = path.extension().and_then(|s| s.to_str())?;
    match ext.to_ascii_lowercase().as_str() {
        "xml" => Some(Direction::XmlToJson),
        "json" => Some(Direction::JsonToXml),
        _ => None,
    }
}
