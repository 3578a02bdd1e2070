use std::fs;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use kvsurge_common::{driver_config_from_yaml, DriverConfig};
use kvsurge_driver::engine::reporter::run_reporter;
use kvsurge_driver::engine::shutdown::install_signal_handler;
use kvsurge_driver::{RunStats, ShutdownFlag, Supervisor};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Connection-rate load generator for key-value servers.
///
/// Opens a fresh connection per request, issues one read command,
/// closes, and reports aggregate throughput once per second until
/// interrupted.
#[derive(Debug, Parser)]
#[command(name = "kvsurge", version)]
struct Cli {
    /// Target server host.
    host: String,
    /// Target server port.
    port: u16,
    /// Desired aggregate connections per second across all workers.
    desired_rate: u32,
    /// Number of worker threads.
    num_threads: NonZeroU32,

    /// Measure per-request latency and report its per-interval average.
    #[arg(long)]
    latency: bool,

    /// Optional YAML tuning file (command string, connect backoff).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Reports own stdout; diagnostics go to stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage errors keep the historical exit status; help and
            // version output still exit cleanly.
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print()?;
            process::exit(code);
        }
    };

    init_logging();

    let mut driver = match cli.config {
        Some(ref path) => {
            let contents = fs::read_to_string(path)?;
            driver_config_from_yaml(&contents)?
        }
        None => DriverConfig::default(),
    };
    if cli.latency {
        driver.measure_latency = true;
    }
    let latency_mode = driver.measure_latency;

    let flag = ShutdownFlag::new();
    install_signal_handler(flag.clone())?;

    let stats = Arc::new(RunStats::new());

    info!(
        host = %cli.host,
        port = cli.port,
        desired_rate = cli.desired_rate,
        num_threads = cli.num_threads.get(),
        latency_mode,
        command = %driver.command,
        "KvSurge started"
    );

    let supervisor = Supervisor::spawn(
        &cli.host,
        cli.port,
        cli.desired_rate,
        cli.num_threads.get(),
        driver,
        &flag,
        Arc::clone(&stats),
    )?;

    run_reporter(&flag, &stats, latency_mode);

    supervisor.join();
    info!("KvSurge stopped");
    Ok(())
}
