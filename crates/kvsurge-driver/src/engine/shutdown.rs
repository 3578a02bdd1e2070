//! Cooperative shutdown.
//!
//! One-way transition: the process starts running and an interrupt
//! signal stops it. Every loop polls the flag at the top of each
//! iteration, so shutdown latency is bounded by the longest single
//! iteration (connect backoff or one command round-trip).

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

/// Process-wide running flag. Clones share the same flag.
#[derive(Debug, Clone)]
pub struct ShutdownFlag {
    running: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Flips the flag. Idempotent; a second interrupt is a no-op.
    pub fn trigger(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Default for ShutdownFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs the SIGINT handler that stops the run.
///
/// The notice shares the stdout lock with the reporter so lines are
/// never torn.
pub fn install_signal_handler(flag: ShutdownFlag) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "Interrupt signal received. Stopping...");
        }
        info!("Shutdown signal received, draining workers");
        flag.trigger();
    })
}
