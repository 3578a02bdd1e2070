pub mod metrics;
pub mod reporter;
pub mod shutdown;
pub mod worker;
