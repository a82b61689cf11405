//! cert-lookup main entry point
//!
//! This is the command-line interface for the certificate lookup tool.

use anyhow::Context;
use cert_lookup::config::{load_config, validate, Config};
use cert_lookup::crawler::{run_lookup, Coordinator};
use cert_lookup::output::CsvReport;
use cert_lookup::{load_certificate_ids, ConfigError, LookupError};
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::signal;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// cert-lookup: fetch card names and grades for certificate IDs
///
/// Reads one certificate ID per line, looks each one up on the grading site
/// with retries and rate limiting, and writes a CSV report with one row per
/// ID. Certificates that cannot be resolved are reported as "Error" and a
/// raw page snapshot is saved for each of them.
#[derive(Parser, Debug)]
#[command(name = "cert-lookup")]
#[command(version)]
#[command(about = "Fetch card information for a list of certificate IDs", long_about = None)]
struct Cli {
    /// Input file with one certificate ID per line [default: certs.txt]
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output CSV file [default: cert_lookup_results_<timestamp>.csv]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of concurrent lookups per window [default: 5]
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Per-fetch timeout in milliseconds [default: 15000]
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Number of retries on failure [default: 3]
    #[arg(short, long)]
    retries: Option<u32>,

    /// Base delay between retries in seconds [default: 2.0]
    #[arg(short, long)]
    delay: Option<f64>,

    /// Delay between dispatches within a window in seconds [default: 1.0]
    #[arg(long)]
    rate_limit: Option<f64>,

    /// Optional TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Certificate page URL prefix
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Directory for debug snapshots of failed certificates
    #[arg(long, value_name = "DIR")]
    debug_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Do not write a run log file
    #[arg(long)]
    no_log_file: bool,
}

impl Cli {
    /// Layers command-line values over the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.input.path = input.display().to_string();
        }
        if let Some(output) = &self.output {
            config.output.report_path = Some(output.display().to_string());
        }
        if let Some(concurrency) = self.concurrency {
            config.batch.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.fetch.timeout_ms = timeout;
        }
        if let Some(retries) = self.retries {
            config.retry.max_retries = retries;
        }
        if let Some(delay) = self.delay {
            config.retry.base_delay_secs = delay;
        }
        if let Some(rate_limit) = self.rate_limit {
            config.batch.rate_limit_secs = rate_limit;
        }
        if let Some(base_url) = &self.base_url {
            config.fetch.base_url = base_url.clone();
        }
        if let Some(debug_dir) = &self.debug_dir {
            config.output.debug_dir = debug_dir.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let started = chrono::Local::now();

    // Setup logging based on verbosity; the guard flushes the log file on exit
    let log_file = (!cli.no_log_file)
        .then(|| PathBuf::from(format!("cert_lookup_{}.log", started.format("%Y%m%d_%H%M%S"))));
    let _log_guard = setup_logging(cli.verbose, cli.quiet, log_file.as_deref());

    // Load and validate configuration
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context("invalid configuration");
        }
    };

    let ids = match load_certificate_ids(Path::new(&config.input.path)) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e).context("failed to load certificate IDs");
        }
    };

    let report = CsvReport::new(config.output.resolve_report_path(started));
    let progress = make_progress_bar(ids.len(), cli.quiet);
    let coordinator = Coordinator::new(config)?.with_progress(progress.clone());

    match run_lookup(&coordinator, &ids, &report, shutdown_signal()).await {
        Ok(_) => {
            progress.finish();
            Ok(())
        }
        Err(LookupError::Interrupted) => {
            progress.abandon();
            Ok(())
        }
        Err(e) => {
            progress.abandon();
            tracing::error!("Fatal error: {}", e);
            Err(e.into())
        }
    }
}

/// Builds the effective configuration: defaults, then the TOML file, then flags
fn build_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Events go to the console and, unless disabled, to a run log file.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("cert_lookup=info,warn"),
            1 => EnvFilter::new("cert_lookup=debug,info"),
            2 => EnvFilter::new("cert_lookup=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let appender = tracing_appender::rolling::never(".", path);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn make_progress_bar(total: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} certificates ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
    pb
}

/// Resolves when the user asks the process to stop
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, abandoning lookups");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, abandoning lookups");
        },
    }
}
