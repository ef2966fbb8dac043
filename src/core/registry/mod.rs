//! Provider registry
//!
//! Holds the live adapters of every category as an immutable snapshot that
//! is swapped wholesale on reload. Dispatches clone the `Arc`s they need
//! from the current snapshot, so a reload never disturbs in-flight calls.
//!
//! - `types` - loaded providers, exclusions and the snapshot itself
//! - `loader` - building and probing the adapters of one category
//! - `registry` - the registry handle: reload, candidates, admin updates

pub mod loader;
pub mod registry;
pub mod types;

pub use registry::ProviderRegistry;
pub use types::{CategorySet, ExcludedProvider, ExclusionReason, LoadedProvider, RegistrySnapshot};
