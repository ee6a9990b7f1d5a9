//! Execute a built pipeline against variants and genes supplied by ingestion

pub mod executor;
/// Build runnable steps from their specifications
pub mod factory;
pub mod filter;
pub mod prioritiser;
/// Per-step counters and the rendered run report
pub mod report;
