//! # provider-failover
//!
//! Multi-provider failover and health orchestration for tax, messaging and
//! payment integrations.
//!
//! ## Features
//!
//! - **Ordered failover**: primary first, then priority, with clean rejections
//!   moving on to the next provider
//! - **Safe writes**: a write whose outcome is unknown is surfaced, never replayed
//! - **Health gating**: providers that fail their load-time probe are excluded
//!   until the next reload
//! - **Usage accounting**: per-provider counters with monthly buckets, flushed
//!   to the configuration store
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use provider_failover::{AdapterFactory, DispatchOptions, FailoverOrchestrator};
//! use provider_failover::config::OrchestratorConfig;
//! use provider_failover::core::types::{MessageRequest, Message, ProviderRequest};
//! use provider_failover::storage::InMemoryConfigStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryConfigStore::new());
//!     let orchestrator = FailoverOrchestrator::new(
//!         store,
//!         AdapterFactory::with_builtin(),
//!         OrchestratorConfig::default(),
//!     );
//!     orchestrator.init().await?;
//!
//!     let request = ProviderRequest::Sms(MessageRequest::Send(Message {
//!         to: "+14155550123".to_string(),
//!         from: None,
//!         subject: None,
//!         text: "Your code is 4821".to_string(),
//!         html: None,
//!         reference: None,
//!     }));
//!     let result = orchestrator.dispatch(&request, &DispatchOptions::default()).await;
//!     println!("sent via {:?}", result.provider_used);
//!
//!     orchestrator.shutdown().await;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use core::orchestrator::{
    Attempt, AttemptOutcome, BatchOptions, DispatchOptions, FailoverError, FailoverOrchestrator,
    FailoverResult,
};
pub use core::providers::{AdapterFactory, ProviderError};
pub use core::types::{ProviderCategory, ProviderConfig, ProviderRequest};
pub use utils::error::{Result, ServiceError};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
