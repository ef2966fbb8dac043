//! Integration tests for provider-failover
//!
//! These tests run the built-in vendor adapters against mock vendor APIs.

pub mod failover_tests;
pub mod reload_tests;
