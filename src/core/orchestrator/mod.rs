//! Failover orchestrator
//!
//! Walks the ordered candidates of a category until one provider answers.
//! Clean rejections advance to the next candidate. An ambiguous failure on a
//! write stops the walk and is surfaced for reconciliation, because the
//! vendor may have applied it.
//!
//! - `error` - the user-visible failure taxonomy
//! - `types` - dispatch options, attempts and results
//! - `orchestrator` - the orchestrator value and its lifecycle

pub mod error;
pub mod orchestrator;
#[cfg(test)]
mod tests;
pub mod types;

pub use error::FailoverError;
pub use orchestrator::FailoverOrchestrator;
pub use types::{Attempt, AttemptOutcome, BatchOptions, DispatchOptions, FailoverResult};
