//! Database storage implementation using SeaORM
//!
//! Provider configs live in a single `provider_configs` table. Credentials,
//! settings, rate limits, health and usage are JSON columns so the record
//! shape can grow without a migration per field.

/// Database entities module
pub mod entities;
/// Database migration module
pub mod migration;
/// SeaORM store implementation module
pub mod seaorm_db;

pub use seaorm_db::{DatabaseBackendType, SeaOrmConfigStore};
