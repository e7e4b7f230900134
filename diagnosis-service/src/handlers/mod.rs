pub mod app;
pub mod diagnose;
pub mod metrics;
