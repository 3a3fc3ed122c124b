use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use formflow_xml::{Node, NodeMap, DEFAULT_ROOT};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "formflow-xml",
    version,
    about = "Parse, build and normalize IntelliSOURCE XML"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Output file (defaults to stdout)
    #[arg(short, long, global = true, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an XML document to its generic JSON shape
    Parse {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
    /// Convert a JSON object to an XML request document
    Build {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Root element name
        #[arg(long, env = "FORMFLOW_XML_ROOT", default_value = DEFAULT_ROOT)]
        root: String,
    },
    /// Normalize a vendor response to JSON
    Normalize {
        #[arg(value_enum)]
        kind: ResponseKind,
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResponseKind {
    Validation,
    Enrollment,
    Scheduling,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let output = match &args.command {
        Command::Parse { input } => {
            let xml = read_input(input)?;
            let node = formflow_xml::parse(&xml).context("failed to parse input")?;
            to_json(&node, args.pretty)?
        }
        Command::Build { input, root } => {
            let json = read_input(input)?;
            let data = json_to_request(&json)?;
            info!(root = %root, entries = data.len(), "building request");
            formflow_xml::build(&data, root)
        }
        Command::Normalize { kind, input } => {
            let xml = read_input(input)?;
            normalize(*kind, &xml, args.pretty)?
        }
    };

    write_output(&args.output, output.as_bytes())?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

fn normalize(kind: ResponseKind, xml: &str, pretty: bool) -> Result<String> {
    info!(?kind, "normalizing response");
    match kind {
        ResponseKind::Validation => {
            let result = formflow_xml::parse_validation(xml)
                .context("failed to parse validation response")?;
            to_json(&result, pretty)
        }
        ResponseKind::Enrollment => {
            let result = formflow_xml::parse_enrollment(xml)
                .context("failed to parse enrollment response")?;
            to_json(&result, pretty)
        }
        ResponseKind::Scheduling => {
            let result = formflow_xml::parse_scheduling(xml)
                .context("failed to parse scheduling response")?;
            debug!(slots = result.slots.len(), "scheduling normalized");
            to_json(&result, pretty)
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("failed to serialize JSON")?;
    json.push('\n');
    Ok(json)
}

fn json_to_request(input: &str) -> Result<NodeMap> {
    let value: serde_json::Value = serde_json::from_str(input).context("input is not valid JSON")?;
    match json_to_node(value) {
        Node::Map(map) => Ok(map),
        _ => bail!("build input must be a JSON object"),
    }
}

fn json_to_node(value: serde_json::Value) -> Node {
    match value {
        serde_json::Value::Object(object) => Node::Map(
            object
                .into_iter()
                .map(|(key, value)| (key, json_to_node(value)))
                .collect(),
        ),
        serde_json::Value::Array(items) => {
            Node::List(items.into_iter().map(json_to_node).collect())
        }
        serde_json::Value::String(text) => Node::Text(text),
        serde_json::Value::Number(number) => Node::Text(number.to_string()),
        serde_json::Value::Bool(flag) => Node::Text(flag.to_string()),
        serde_json::Value::Null => Node::Text(String::new()),
    }
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
