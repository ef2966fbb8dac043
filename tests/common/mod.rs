//! Common test utilities
//!
//! - `database`: isolated SQLite-backed configuration stores
//! - `fixtures`: provider configs, orchestrator settings and requests
//! - `vendors`: mock vendor APIs

pub mod database;
pub mod fixtures;
pub mod vendors;
