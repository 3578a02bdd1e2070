//! The rate-limited request cycle and its supervisor.
//!
//! Each worker repeats one-second windows: open a connection, issue the
//! read command, close, up to `rate_per_thread` times per window, then
//! sleep out the remainder so successive windows stay aligned to
//! one-second boundaries. The rate is a ceiling, not a guarantee: a
//! slow or unreachable server simply yields fewer cycles.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use kvsurge_common::{split_rate, DriverConfig, WorkerConfig};
use tracing::{info, trace};

use crate::client::{Dialer, KvConnection, TcpDialer};
use crate::engine::metrics::RunStats;
use crate::engine::shutdown::ShutdownFlag;

const WINDOW: Duration = Duration::from_secs(1);

/// Drives request cycles at up to `cfg.rate_per_thread` per second until
/// the flag flips.
///
/// Connection failures are deliberate non-events: the tool measures the
/// achievable rate against a possibly overloaded target, so a failed
/// dial backs off and retries without counting anything or surfacing an
/// error.
pub fn run_worker<D: Dialer>(
    cfg: &WorkerConfig,
    driver: &DriverConfig,
    dialer: &D,
    flag: &ShutdownFlag,
    stats: &RunStats,
) {
    let backoff = Duration::from_millis(driver.connect_backoff_ms);

    while flag.is_running() {
        let window_start = Instant::now();
        let mut completed: u32 = 0;

        while completed < cfg.rate_per_thread && flag.is_running() {
            let cycle_start = Instant::now();

            let mut conn = match dialer.dial() {
                Ok(conn) => conn,
                Err(err) => {
                    trace!(error = %err, "connect failed, backing off");
                    thread::sleep(backoff);
                    continue;
                }
            };

            // A null reply is tolerated, and a failed command still
            // counts as a completed cycle; either way the connection is
            // closed and the tally moves on.
            if let Err(err) = conn.execute(&driver.command) {
                trace!(error = %err, "command failed on established connection");
            }
            drop(conn);

            completed += 1;
            stats.record_cycle();
            if driver.measure_latency {
                let micros = cycle_start.elapsed().as_secs_f64() * 1_000_000.0;
                stats.record_latency_us(micros);
            }

            // Quota unmet but the window is over: break early rather
            // than overshoot into the next window.
            if window_start.elapsed() >= WINDOW {
                break;
            }
        }

        let elapsed = window_start.elapsed();
        if elapsed < WINDOW {
            thread::sleep(WINDOW - elapsed);
        }
    }
}

/// Spawns the worker threads and joins them on shutdown.
pub struct Supervisor {
    workers: Vec<JoinHandle<()>>,
}

impl Supervisor {
    /// Spawns `num_threads` workers, each targeting
    /// `desired_rate / num_threads` cycles per second. Floor division;
    /// callers have already validated `num_threads > 0`.
    pub fn spawn(
        host: &str,
        port: u16,
        desired_rate: u32,
        num_threads: u32,
        driver: DriverConfig,
        flag: &ShutdownFlag,
        stats: Arc<RunStats>,
    ) -> io::Result<Self> {
        let rate_per_thread = split_rate(desired_rate, num_threads);
        info!(num_threads, rate_per_thread, "spawning workers");

        let driver = Arc::new(driver);
        let mut workers = Vec::with_capacity(num_threads as usize);
        for i in 0..num_threads {
            let cfg = WorkerConfig {
                host: host.to_string(),
                port,
                rate_per_thread,
            };
            let driver = Arc::clone(&driver);
            let flag = flag.clone();
            let stats = Arc::clone(&stats);
            let handle = thread::Builder::new()
                .name(format!("worker-{i}"))
                .spawn(move || {
                    let dialer = TcpDialer::new(cfg.host.clone(), cfg.port);
                    run_worker(&cfg, &driver, &dialer, &flag, &stats);
                })?;
            workers.push(handle);
        }

        Ok(Self { workers })
    }

    /// Waits for every worker to observe the flag and exit. No worker is
    /// ever force-terminated.
    pub fn join(self) {
        for handle in self.workers {
            if let Err(panic) = handle.join() {
                // Workers have no panic paths of their own; surface
                // anything unexpected instead of swallowing it.
                tracing::error!(?panic, "worker thread panicked");
            }
        }
        info!("all workers joined");
    }
}
