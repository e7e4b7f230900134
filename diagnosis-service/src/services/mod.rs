pub mod artifacts;
pub mod metrics;
