//! `phpser` CLI — convert between JSON and PHP serialized data.
//!
//! ## Usage
//!
//! ```sh
//! # JSON to PHP serialized text (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | phpser serialize
//!
//! # From file to file
//! phpser serialize -i data.json -o data.ser
//!
//! # PHP serialized text back to pretty-printed JSON
//! phpser unserialize -i data.ser
//!
//! # Summarize a serialized blob without converting it
//! phpser inspect -i session.ser
//!
//! # Verbose logs as JSON lines on stderr
//! RUST_LOG=debug phpser --log-format json unserialize -i data.ser
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use phpser_core::{
    DecodeOptions, PhpCodec, PhpSerializer, Value, DEFAULT_MAX_DEPTH, DEFAULT_MAX_REFERENCE_NODES,
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "phpser",
    version,
    about = "Convert between JSON and PHP serialize() format"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum array/object nesting accepted when decoding (0 = unlimited)
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Ignore bytes after the serialized value instead of failing
    #[arg(long, global = true)]
    allow_trailing: bool,

    /// Reject r:/R: back references
    #[arg(long, global = true)]
    no_references: bool,

    /// Maximum number of values back references may copy (0 = unlimited)
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_REFERENCE_NODES)]
    max_reference_nodes: usize,

    /// Log output format (filter with RUST_LOG, default "warn")
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON as PHP serialized text
    Serialize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Decode PHP serialized text to JSON
    Unserialize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit minified JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Show the shape of PHP serialized data (type, size, depth)
    Inspect {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let options = DecodeOptions::default()
        .max_depth(cli.max_depth)
        .allow_trailing_data(cli.allow_trailing)
        .allow_references(!cli.no_references)
        .max_reference_nodes(cli.max_reference_nodes);
    tracing::debug!(?options, "decoder configured");
    let php = PhpSerializer::with_options(options);

    match cli.command {
        Commands::Serialize { input, output } => {
            let json = read_input(input.as_deref())?;
            let text = serialize_json(&php, &json)?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Unserialize {
            input,
            output,
            compact,
        } => {
            let raw = read_input(input.as_deref())?;
            let value = php
                .unserialize(trim_line_end(&raw))
                .context("Failed to unserialize input")?;
            let json = value.to_json().context("Failed to convert value to JSON")?;
            let rendered = if compact {
                serde_json::to_string(&json)?
            } else {
                serde_json::to_string_pretty(&json)?
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Inspect { input } => {
            let raw = read_input(input.as_deref())?;
            let value = php
                .unserialize(trim_line_end(&raw))
                .context("Failed to unserialize input")?;
            print!("{}", describe(&value, raw.len()));
        }
    }

    Ok(())
}

/// Parse JSON and hand it to the codec. Kept separate from `main` so the
/// codec is only ever reached through the `PhpCodec` interface.
fn serialize_json(php: &dyn PhpCodec, json: &str) -> Result<String> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).context("Failed to parse JSON input")?;
    php.serialize(&Value::from_json(&parsed))
        .context("Failed to serialize JSON to PHP format")
}

/// Render the `inspect` report.
fn describe(value: &Value, input_bytes: usize) -> String {
    let mut report = String::new();
    report.push_str(&format!("Type:       {}\n", value.type_name()));
    if let Value::Object(obj) = value {
        report.push_str(&format!("Class:      {}\n", obj.class));
    }
    if let Some(len) = value.len() {
        report.push_str(&format!("Entries:    {}\n", len));
    }
    report.push_str(&format!("Values:     {}\n", value.node_count()));
    report.push_str(&format!("Depth:      {}\n", value.depth()));
    report.push_str(&format!("Input size: {} bytes\n", input_bytes));
    report
}

/// Files and pipes usually end with a newline that is not part of the data;
/// a serialized value always ends in `;` or `}` so stripping it is safe.
fn trim_line_end(s: &str) -> &str {
    s.trim_end_matches(['\n', '\r'])
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
