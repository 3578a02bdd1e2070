//! Once-per-second reporting.
//!
//! The report goes to stdout; diagnostics go to stderr via `tracing`.
//! Printing holds the stdout lock so report blocks and the interrupt
//! notice never interleave.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crate::engine::metrics::{IntervalStats, RunStats};
use crate::engine::shutdown::ShutdownFlag;

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Formats one report block.
///
/// In latency mode a zero-connection interval prints an `n/a` sentinel
/// rather than a division by zero. In throughput mode the "average"
/// line reproduces the historical formula (last interval's count over
/// elapsed seconds, integer division), which is not a true cumulative
/// average; changing it is a stakeholder question, not a code fix.
pub fn format_report(interval: &IntervalStats, elapsed_secs: u64, latency_mode: bool) -> String {
    let mut report = format!("Connections in last second: {}\n", interval.connections);
    if latency_mode {
        match interval.average_latency_us() {
            Some(avg) => {
                report.push_str(&format!("Average latency: {avg:.2} microseconds\n"));
            }
            None => report.push_str("Average latency: n/a (no completed cycles)\n"),
        }
    } else {
        report.push_str(&format!(
            "Average connections per second: {}\n",
            interval.connections / elapsed_secs
        ));
    }
    report
}

/// Sleeps, drains the counters, prints. Runs on the main thread until
/// the flag flips; the final partial interval is not reported.
pub fn run_reporter(flag: &ShutdownFlag, stats: &RunStats, latency_mode: bool) {
    let mut elapsed_secs: u64 = 0;

    while flag.is_running() {
        thread::sleep(REPORT_INTERVAL);
        elapsed_secs += 1;

        let interval = stats.take_interval();
        let report = format_report(&interval, elapsed_secs, latency_mode);

        let mut out = io::stdout().lock();
        let _ = out.write_all(report.as_bytes());
    }
}
