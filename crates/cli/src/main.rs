//! shelfwise: read expiry dates from OCR'd packaging text.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use shelfwise_core::{set_past_years_window, EngineConfig, ParsedDate};
use shelfwise_ocr::{ExpiryParser, ExpiryPipeline, PlainTextRecognizer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shelfwise")]
#[command(version)]
#[command(about = "Expiry-date extraction from noisy OCR text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// How many years in the past a date may lie (1-50)
    #[arg(long, global = true)]
    past_years: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single line of text
    Parse {
        /// Text to parse
        text: String,
    },

    /// Scan a recognized-text file, one OCR box per line
    Scan {
        /// Path to the text file
        path: PathBuf,
    },

    /// Read an OCR block from stdin and report its dates
    Lines {
        /// List every dated line instead of the best one
        #[arg(long)]
        all: bool,
    },

    /// Exit with status 0 if the text carries an expiry keyword
    Keyword {
        /// Text to check
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Some(path) = &cli.config {
        EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?
            .apply();
    }
    // The flag overrides the file.
    if let Some(years) = cli.past_years {
        set_past_years_window(years);
    }

    let parser = ExpiryParser::snapshot();
    tracing::debug!(window = %parser.window(), "reasonableness window");

    match cli.command {
        Commands::Parse { text } => print_json(&report(&parser, &parser.parse(&text))),

        Commands::Scan { path } => {
            let pipeline = ExpiryPipeline::new(PlainTextRecognizer);
            let result = pipeline
                .process_file(&path, &parser)
                .await
                .with_context(|| format!("scanning {}", path.display()))?;
            let mut value = json!(result);
            value["best"] = report(&parser, &result.best);
            print_json(&value)
        }

        Commands::Lines { all } => {
            let mut block = String::new();
            std::io::stdin()
                .read_to_string(&mut block)
                .context("reading stdin")?;
            if all {
                let found: Vec<_> = parser
                    .find_dates_in_ocr_text(&block)
                    .iter()
                    .map(|p| report(&parser, p))
                    .collect();
                print_json(&json!(found))
            } else {
                print_json(&report(&parser, &parser.best_date_from_ocr(&block)))
            }
        }

        Commands::Keyword { text } => {
            let hit = shelfwise_ocr::contains_expiry_keyword(&text);
            println!("{hit}");
            if !hit {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// The wire form of a result plus the days left before it expires.
fn report(parser: &ExpiryParser, parsed: &ParsedDate) -> serde_json::Value {
    let mut value = json!(parsed);
    if let (Some(days), Some(obj)) = (parser.days_remaining(parsed), value.as_object_mut()) {
        obj.insert("daysUntil".into(), json!(days));
    }
    value
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
