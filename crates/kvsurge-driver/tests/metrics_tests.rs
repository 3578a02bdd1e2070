use std::sync::Arc;
use std::thread;

use kvsurge_driver::engine::reporter::format_report;
use kvsurge_driver::{IntervalStats, RunStats};

#[test]
fn concurrent_cycle_counts_are_never_lost() {
    const THREADS: usize = 8;
    const PER_THREAD: u64 = 10_000;

    let stats = Arc::new(RunStats::new());
    let mut handles = Vec::new();
    for _ in 0..THREADS {
        let stats = Arc::clone(&stats);
        handles.push(thread::spawn(move || {
            for _ in 0..PER_THREAD {
                stats.record_cycle();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let interval = stats.take_interval();
    assert_eq!(interval.connections, THREADS as u64 * PER_THREAD);
}

#[test]
fn concurrent_latency_samples_are_never_lost() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 1_000;
    const SAMPLE: f64 = 0.5;

    let stats = Arc::new(RunStats::new());
    let mut handles = Vec::new();
    for _ in 0..THREADS {
        let stats = Arc::clone(&stats);
        handles.push(thread::spawn(move || {
            for _ in 0..PER_THREAD {
                stats.record_latency_us(SAMPLE);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let total = stats.take_interval().latency_us;
    let expected = THREADS as f64 * PER_THREAD as f64 * SAMPLE;
    assert!(
        (total - expected).abs() < 1e-6,
        "expected {expected}, got {total}"
    );
}

#[test]
fn take_interval_resets_both_accumulators() {
    let stats = RunStats::new();
    stats.record_cycle();
    stats.record_latency_us(123.0);

    let first = stats.take_interval();
    assert_eq!(first.connections, 1);
    assert!((first.latency_us - 123.0).abs() < f64::EPSILON);

    let second = stats.take_interval();
    assert_eq!(second.connections, 0);
    assert_eq!(second.latency_us, 0.0);
}

#[test]
fn empty_interval_has_no_latency_average() {
    let interval = IntervalStats {
        connections: 0,
        latency_us: 0.0,
    };
    assert_eq!(interval.average_latency_us(), None);
}

#[test]
fn latency_average_times_count_recovers_the_total() {
    let interval = IntervalStats {
        connections: 4,
        latency_us: 202.0,
    };
    let avg = interval.average_latency_us().unwrap();
    assert!((avg * 4.0 - 202.0).abs() < 1e-9);
}

#[test]
fn report_reproduces_the_historical_average_formula() {
    // Last interval's count over elapsed seconds, integer division:
    // 15 connections after 2 seconds prints 7, not a cumulative mean.
    let interval = IntervalStats {
        connections: 15,
        latency_us: 0.0,
    };
    let report = format_report(&interval, 2, false);
    assert!(report.contains("Connections in last second: 15"));
    assert!(report.contains("Average connections per second: 7"));
}

#[test]
fn latency_report_prints_the_interval_average() {
    let interval = IntervalStats {
        connections: 4,
        latency_us: 200.0,
    };
    let report = format_report(&interval, 1, true);
    assert!(report.contains("Connections in last second: 4"));
    assert!(report.contains("Average latency: 50.00 microseconds"));
}

#[test]
fn latency_report_for_an_idle_interval_prints_a_sentinel() {
    let interval = IntervalStats {
        connections: 0,
        latency_us: 0.0,
    };
    let report = format_report(&interval, 3, true);
    assert!(report.contains("Average latency: n/a"));
    assert!(!report.contains("NaN"));
    assert!(!report.contains("inf"));
}
