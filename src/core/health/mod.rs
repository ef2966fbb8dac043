//! Health monitoring of live providers
//!
//! # Module Structure
//!
//! - `types` - the aggregated health report
//! - `monitor` - on-demand probing, persistence and the periodic task
//! - `tests` - test suite for health monitoring

pub mod monitor;
pub mod types;

pub use monitor::HealthMonitor;
pub use types::{CategoryHealth, HealthReport, OverallHealth, ProviderHealthStatus};
