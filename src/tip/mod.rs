//! Tip generation core
//!
//! Everything between the transport and the provider lives here: the rate
//! limiter gating provider calls, the validator bounding generated output,
//! the generator composing the two around a provider call, and the service
//! coordinating cache lookups with generation.

mod generator;
mod limiter;
mod service;
mod validate;

pub use generator::TipGenerator;
pub use limiter::RateLimiter;
pub use service::TipService;
pub use validate::{sanitize, validate};

use thiserror::Error;

/// Failures surfaced by tip generation and persistence
///
/// Variants carry rendered messages rather than source errors so that a
/// single generation outcome can be shared across every caller waiting on
/// it (`Clone`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TipError {
    /// The provider call failed or timed out
    #[error("tip provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered, but the text failed validation
    #[error("generated tip rejected: {0}")]
    InvalidContent(String),

    /// A generated tip could not be committed to the history file
    #[error("tip history write failed: {0}")]
    StorageWriteFailed(String),
}
