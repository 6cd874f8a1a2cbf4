//! CLI for template-driven document field extraction.

mod config;
mod console;
mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use docparse_core::ReportFormat;
use docparse_core::models::config::DocparseConfig;

use console::{Console, Verbosity};
use pipeline::{ExitStatus, Options};

/// Extract template-defined fields from a document page into a report
#[derive(Parser)]
#[command(name = "docparse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input document (PDF, text, or image)
    #[arg(short, long, value_parser = existing_file)]
    input: PathBuf,

    /// Template file; repeat to merge several templates
    #[arg(short, long = "template", value_name = "TEMPLATE", required = true, value_parser = existing_file)]
    templates: Vec<PathBuf>,

    /// Output report path
    #[arg(short, long)]
    output: PathBuf,

    /// Zero-based page index
    #[arg(short, long, default_value_t = 0)]
    page: u32,

    /// Run OCR on pages without embedded text
    #[arg(long)]
    ocr: bool,

    /// OCR rendering resolution (default from config, 288)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10000))]
    dpi: Option<u32>,

    /// Enable verbose output (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Abort parsing after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum OutputFormat {
    /// Plain text report
    Text,
    /// JSON report
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

impl Cli {
    /// Resolve flags against the loaded configuration.
    fn options(&self, config: &DocparseConfig) -> Options {
        let format = match (self.json, self.format) {
            (true, _) => ReportFormat::Json,
            (false, Some(format)) => format.into(),
            (false, None) => config.output.format,
        };

        Options {
            input: self.input.clone(),
            templates: self.templates.clone(),
            output: self.output.clone(),
            page_index: self.page,
            ocr: self.ocr,
            dpi: self.dpi.unwrap_or(config.pdf.default_dpi),
            format,
            timeout: self
                .timeout
                .or(config.parse.timeout_secs)
                .map(Duration::from_secs),
            ocr_config: config.ocr.clone(),
        }
    }
}

fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("file not found: {value}"))
    }
}

fn init_tracing(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let console = Console::new(Verbosity::from_flags(cli.verbose, cli.quiet));

    if let Err(e) = init_tracing(cli.verbose, cli.quiet) {
        console.error(&format!("Failed to initialize logging: {e}"));
        return ExitStatus::SetupError.into();
    }

    let config = match config::load(cli.config.as_deref()) {
        Ok((config, source)) => {
            if let Some(path) = source {
                console.verbose(&format!("Using config: {}", path.display()));
            }
            config
        }
        Err(e) => {
            console.error(&format!("Failed to load configuration: {e}"));
            return ExitStatus::SetupError.into();
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            console.error(&format!("Failed to start runtime: {e}"));
            return ExitStatus::SetupError.into();
        }
    };

    let result = runtime.block_on(pipeline::run(cli.options(&config), &console));
    // A timed-out parse may still hold a blocking thread.
    runtime.shutdown_background();

    match result {
        Ok(summary) => {
            console.info("");
            console.success("Parsing completed successfully!");
            console.info(&format!(
                "  Fields matched: {} of {}",
                summary.fields_matched, summary.total_fields_found
            ));
            console.info(&format!("  Total time: {:.2}s", summary.elapsed.as_secs_f64()));
            console.info(&format!("  Output format: {}", summary.format));
            ExitStatus::Success.into()
        }
        Err(failure) => {
            console.error(&format!("{:#}", failure.error));
            failure.status.into()
        }
    }
}
