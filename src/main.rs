use analytics::{MetricsEngine, ReportOptions};
use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{LoggingSettings, OutputFormat, Settings};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod render;

/// The main entry point for the climate EDA application.
#[tokio::main]
async fn main() -> ExitCode {
    // Load CLIMATE__* overrides from a .env file if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = match configuration::load_config(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = init_tracing(&settings.logging);

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Report(args) => handle_report(args, settings),
        Commands::Serve(args) => handle_serve(args, settings).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed.");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Exploratory data analysis over a per-country, per-year climate dataset.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. A missing file means all defaults.
    #[arg(long, global = true, default_value = "climate.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the twelve exploratory questions and print the results.
    Report(ReportArgs),
    /// Serve the interactive dashboard API.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// The climate CSV to analyse (overrides `dataset.path`).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Output style (overrides `report.format`).
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Countries kept by the ranked questions (overrides `report.top_k`).
    #[arg(long)]
    top_k: Option<usize>,

    /// Pairs printed by the sample questions (overrides `report.sample_size`).
    #[arg(long)]
    sample_size: Option<usize>,
}

#[derive(Parser)]
struct ServeArgs {
    /// The climate CSV to serve (overrides `dataset.path`).
    #[arg(long)]
    data: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Loads the dataset once, runs every question and prints the answers.
fn handle_report(args: ReportArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(data) = args.data {
        settings.dataset.path = data;
    }
    if let Some(format) = args.format {
        settings.report.format = format;
    }
    if let Some(top_k) = args.top_k {
        settings.report.top_k = top_k;
    }
    if let Some(sample_size) = args.sample_size {
        settings.report.sample_size = sample_size;
    }
    settings.validate()?;

    let table = dataset::load_table(&settings.dataset.path)
        .with_context(|| format!("cannot run the report on {}", settings.dataset.path.display()))?;

    let engine = MetricsEngine::with_thresholds(settings.thresholds);
    let options = ReportOptions {
        top_k: settings.report.top_k,
        sample_size: settings.report.sample_size,
    };
    let report = engine.report(&table, &options);

    let output = match settings.report.format {
        OutputFormat::Text => render::text(&report)?,
        OutputFormat::Table => render::tables(&report),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };
    println!("{}", output);
    Ok(())
}

/// Starts the dashboard API. A missing dataset does not stop the server.
async fn handle_serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(data) = args.data {
        settings.dataset.path = data;
    }
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.validate()?;

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;
    let state = Arc::new(web_server::AppState::new(&settings));
    web_server::run_server(addr, state).await
}

/// Sets up console logging and, when configured, a daily rolling log file.
///
/// `RUST_LOG` takes precedence over `logging.level`. The returned guard must be
/// held until exit so buffered file output is flushed.
fn init_tracing(logging: &LoggingSettings) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let console = fmt::layer().with_writer(std::io::stderr);

    match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "climate-eda.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .init();
            None
        }
    }
}
