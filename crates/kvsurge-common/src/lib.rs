use serde::Deserialize;

/// Tunable driver behavior shared by every worker.
///
/// All fields have defaults so a tuning file only needs to name the
/// values it wants to change. CLI flags override whatever is loaded.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DriverConfig {
    /// The single read command issued on every connection.
    pub command: String,
    /// Backoff after a failed connection attempt, in milliseconds.
    pub connect_backoff_ms: u64,
    /// Measure per-request latency and report its per-interval average
    /// instead of the running connections-per-second figure.
    pub measure_latency: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            command: "GET testkey".to_string(),
            connect_backoff_ms: 10,
            measure_latency: false,
        }
    }
}

/// Immutable per-worker parameters, fixed at spawn time.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub host: String,
    pub port: u16,
    pub rate_per_thread: u32,
}

/// Divides the desired aggregate rate evenly among workers.
///
/// Integer division: the remainder is dropped, so the actual aggregate
/// target may be slightly below `desired_rate` when it is not a multiple
/// of `num_threads`.
pub fn split_rate(desired_rate: u32, num_threads: u32) -> u32 {
    desired_rate / num_threads
}

/// Parses a YAML tuning file into a `DriverConfig`.
pub fn driver_config_from_yaml(contents: &str) -> Result<DriverConfig, serde_yaml::Error> {
    serde_yaml::from_str(contents)
}
