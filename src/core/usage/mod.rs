//! Per-provider usage accounting
//!
//! - `counters` - lock-free counters and the monthly bucket ring for one provider
//! - `accumulator` - the concurrent map of counters, flushing and reporting
//! - `types` - month ranges and the stats report returned to callers

pub mod accumulator;
pub mod counters;
pub mod types;

pub use accumulator::UsageAccumulator;
pub use counters::ProviderUsage;
pub use types::{CategoryTotals, MonthRange, PeriodTotals, ProviderStats, UsageReport};
