pub mod client;
pub mod engine;
pub mod proto;

pub use engine::metrics::{IntervalStats, RunStats};
pub use engine::shutdown::ShutdownFlag;
pub use engine::worker::{run_worker, Supervisor};
