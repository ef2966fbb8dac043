//! Core functionality of the orchestrator
//!
//! ## Module Structure
//!
//! - `types`: domain types shared by every layer
//! - `providers`: vendor adapters and the factory that builds them
//! - `registry`: live provider sets per category
//! - `health`: probing and health reports
//! - `usage`: in-memory usage counters and stats
//! - `orchestrator`: ordered dispatch with failover

pub mod health;
pub mod orchestrator;
pub mod providers;
pub mod registry;
pub mod types;
pub mod usage;
