//! # Reef CLI
//!
//! Usage:
//!   reef render request.json -o CR-2026-123456.pdf
//!   cat request.json | reef render - --format html
//!   reef example > request.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use reef::config::RenderConfig;
use reef::error::ReefError;
use reef::{CheckRequestRenderer, OutputFormat};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a check request from `{ "record": ..., "dimensionTypes": [...] }`.
    Render {
        /// Input JSON file, or `-` for stdin.
        input: String,

        /// Output path. Defaults to `<generatedId>.<ext>` in the current
        /// directory.
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = Format::Pdf)]
        format: Format,

        /// Render config JSON.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print an example input.
    Example,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Pdf,
    Html,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Pdf => OutputFormat::Pdf,
            Format::Html => OutputFormat::Html,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Example => {
            print!("{}", EXAMPLE_INPUT);
            ExitCode::SUCCESS
        }
        Command::Render {
            input,
            output,
            format,
            config,
        } => match render(&input, output, format.into(), config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("✗ {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn render(
    input: &str,
    output: Option<PathBuf>,
    format: OutputFormat,
    config: Option<PathBuf>,
) -> Result<(), ReefError> {
    let json = if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input)?
    };

    let config = match config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    let generated = CheckRequestRenderer::new(config).render_json(&json, format)?;
    let path = output.unwrap_or_else(|| PathBuf::from(generated.file_name()));
    fs::write(&path, &generated.bytes)?;
    eprintln!(
        "✓ {} written to {} ({} bytes)",
        generated.generated_id,
        path.display(),
        generated.bytes.len()
    );
    Ok(())
}

const EXAMPLE_INPUT: &str = r##"{
  "record": {
    "vendorName": "Acme Restaurant Supply",
    "vendorId": "V-1042",
    "locationName": "Downtown Bistro",
    "invoiceDate": "2026-10-18",
    "dueDate": "2026-11-17",
    "requestedBy": "Jordan Lee",
    "notes": "Emergency replacement of walk-in cooler gaskets.\nApproved by GM on site.",
    "lineItems": [
      {
        "description": "Cooler door gaskets (x4)",
        "amount": "312.40",
        "dimensions": {
          "Account": { "value": 6120, "label": "6120 – Repairs & Maintenance" },
          "Department": { "value": 3, "label": "Kitchen" }
        }
      },
      {
        "description": "Service call",
        "amount": "145",
        "dimensions": {
          "Account": { "value": 6120, "label": "6120 – Repairs & Maintenance" },
          "Department": null
        }
      }
    ]
  },
  "dimensionTypes": [
    { "key": "Account", "label": "GL Account" },
    { "key": "Department", "label": "Department" }
  ]
}
"##;
