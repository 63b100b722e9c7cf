//! Single-tip production

use std::sync::Arc;

use crate::cache::TipEntry;
use crate::provider::Provider;

use super::{limiter::RateLimiter, validate, TipError};

/// The fixed request sent to the provider for every tip
const TIP_PROMPT: &str =
    "Give one short daily health and fitness tip for adults, under 200 characters.";

/// Produces one new validated tip per call
///
/// Composes the rate limiter, the provider call, and the validator. The
/// generator persists nothing; committing an accepted tip to the history is
/// the caller's job, which keeps producing content and committing it
/// separately testable and separately failable.
pub struct TipGenerator {
    provider: Arc<dyn Provider>,
    limiter: Arc<RateLimiter>,
    max_tip_chars: usize,
}

impl TipGenerator {
    /// Creates a generator over the given provider and rate limiter.
    ///
    /// The limiter is injected rather than owned so that every generation
    /// path in the process shares the one provider quota.
    pub fn new(
        provider: Arc<dyn Provider>,
        limiter: Arc<RateLimiter>,
        max_tip_chars: usize,
    ) -> Self {
        Self {
            provider,
            limiter,
            max_tip_chars,
        }
    }

    /// Generates, sanitizes, and validates one new tip.
    ///
    /// Waits on the rate limiter first, which may block the caller for up
    /// to the configured minimum call interval. Provider failures surface
    /// as [`TipError::ProviderUnavailable`], validation failures as
    /// [`TipError::InvalidContent`]. No retries happen here; retry policy
    /// belongs to the caller.
    pub async fn generate_new(&self) -> Result<TipEntry, TipError> {
        self.limiter.acquire().await;

        let raw = self
            .provider
            .complete(TIP_PROMPT)
            .await
            .map_err(|err| TipError::ProviderUnavailable(err.to_string()))?;

        let clean = validate::sanitize(&raw);
        validate::validate(&clean, self.max_tip_chars)
    }
}
