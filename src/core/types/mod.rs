//! Core type definition module
//!
//! Contains the provider configuration model, the per-category request and
//! response payloads, and the request context passed into adapters.

pub mod category;
pub mod context;
pub mod provider_config;
pub mod requests;
pub mod responses;

// Re-export all public types
pub use category::*;
pub use context::*;
pub use provider_config::*;
pub use requests::*;
pub use responses::*;
