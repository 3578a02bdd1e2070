//! Cross-thread run statistics.
//!
//! Workers only ever add; the reporter exchanges both accumulators to
//! zero once per interval. The two swaps are independent atomic
//! operations, so in rare cases a cycle's count lands in one interval
//! and its latency in the next. That approximation is accepted.

use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counters for the whole run.
pub struct RunStats {
    connections: AtomicU64,
    /// `f64` bit pattern; std has no atomic float, so additions go
    /// through a compare-and-swap retry loop.
    latency_us_bits: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            connections: AtomicU64::new(0),
            latency_us_bits: AtomicU64::new(0f64.to_bits()),
        }
    }

    /// Counts one completed connect-execute-close cycle.
    pub fn record_cycle(&self) {
        self.connections.fetch_add(1, Ordering::SeqCst);
    }

    /// Folds one latency sample (microseconds) into the accumulator,
    /// retrying until the swap lands.
    pub fn record_latency_us(&self, sample: f64) {
        let mut current = self.latency_us_bits.load(Ordering::SeqCst);
        loop {
            let desired = (f64::from_bits(current) + sample).to_bits();
            match self.latency_us_bits.compare_exchange_weak(
                current,
                desired,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// Exchanges both accumulators for zero and returns what the last
    /// interval observed.
    pub fn take_interval(&self) -> IntervalStats {
        let connections = self.connections.swap(0, Ordering::SeqCst);
        let latency_us = f64::from_bits(self.latency_us_bits.swap(0f64.to_bits(), Ordering::SeqCst));
        IntervalStats {
            connections,
            latency_us,
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// What one reporting interval observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalStats {
    pub connections: u64,
    pub latency_us: f64,
}

impl IntervalStats {
    /// Average per-request latency for the interval.
    ///
    /// `None` when the interval completed no cycles; the caller prints a
    /// sentinel instead of dividing by zero.
    pub fn average_latency_us(&self) -> Option<f64> {
        if self.connections == 0 {
            None
        } else {
            Some(self.latency_us / self.connections as f64)
        }
    }
}
