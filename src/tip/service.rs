//! Request-facing tip operations
//!
//! `TipService` is the decision engine between the transport, the cache
//! store, and the tip generator: it answers "today's tip", "force a new
//! tip", and "list history" under the service invariants (cache-hit fast
//! path, at most one generation per day unless forced, no partial cache
//! mutations).

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::cache::{CacheStore, TipEntry};

use super::{generator::TipGenerator, TipError};

/// One in-flight daily generation, shareable across concurrent callers
type TipFlight = Shared<BoxFuture<'static, Result<TipEntry, TipError>>>;

/// Coordinates the cache store and tip generator behind the three
/// transport-facing operations.
pub struct TipService {
    inner: Arc<ServiceInner>,
    /// The at-most-one in-flight `daily_tip` generation, keyed by day
    in_flight: Mutex<Option<(NaiveDate, TipFlight)>>,
}

struct ServiceInner {
    store: CacheStore,
    generator: TipGenerator,
}

impl TipService {
    /// Creates the service over an opened store and a configured generator.
    pub fn new(store: CacheStore, generator: TipGenerator) -> Self {
        Self {
            inner: Arc::new(ServiceInner { store, generator }),
            in_flight: Mutex::new(None),
        }
    }

    /// Returns today's tip, generating one if none exists yet.
    ///
    /// A cache hit touches neither the provider nor the rate limiter.
    /// Concurrent misses for the same day collapse into a single
    /// generation: the first caller registers the attempt, every later
    /// caller attaches to it, and all of them are released with that
    /// attempt's outcome, success or failure, without retrying.
    pub async fn daily_tip(&self) -> Result<TipEntry, TipError> {
        let today = Utc::now().date_naive();
        if let Some(hit) = self.inner.store.latest_for(today) {
            return Ok(hit);
        }

        let flight = self.join_flight(today);
        let result = flight.clone().await;

        // Deregister the finished flight. A completed failure must not keep
        // satisfying later misses for the rest of the day; a success is
        // already served from the cache on the fast path above.
        let mut in_flight = self.in_flight.lock().expect("in-flight lock poisoned");
        if let Some((date, current)) = in_flight.as_ref() {
            if *date == today && current.ptr_eq(&flight) {
                *in_flight = None;
            }
        }
        drop(in_flight);

        result
    }

    /// Unconditionally generates and appends a new tip for today.
    ///
    /// Every call is a distinct, intentional generation attempt: there is
    /// no single-flight collapsing here, though each attempt still queues
    /// behind the rate limiter. On success today may hold two entries, and
    /// lookups resolve to the newest one. On failure the cache is left
    /// unmodified.
    pub async fn force_refresh(&self) -> Result<TipEntry, TipError> {
        let entry = self.inner.generator.generate_new().await?;
        self.inner
            .store
            .append(entry.clone())
            .map_err(|err| TipError::StorageWriteFailed(err.to_string()))?;
        Ok(entry)
    }

    /// Returns the retained history, oldest first.
    ///
    /// Never touches the provider; only reflects prior durable state.
    pub fn history(&self) -> Vec<TipEntry> {
        self.inner.store.all()
    }

    /// Returns the flight for `today`, registering a new one on the first
    /// miss of the day.
    fn join_flight(&self, today: NaiveDate) -> TipFlight {
        let mut in_flight = self.in_flight.lock().expect("in-flight lock poisoned");
        match in_flight.as_ref() {
            Some((date, flight)) if *date == today => flight.clone(),
            _ => {
                let inner = Arc::clone(&self.inner);
                let flight = async move { inner.generate_and_commit(today).await }
                    .boxed()
                    .shared();
                *in_flight = Some((today, flight.clone()));
                flight
            }
        }
    }
}

impl ServiceInner {
    /// The serialized miss-then-generate-then-append sequence.
    async fn generate_and_commit(&self, today: NaiveDate) -> Result<TipEntry, TipError> {
        // A flight that finished between the caller's miss and this one
        // starting may already have committed today's tip.
        if let Some(hit) = self.store.latest_for(today) {
            return Ok(hit);
        }

        let entry = self.generator.generate_new().await?;
        self.store
            .append(entry.clone())
            .map_err(|err| TipError::StorageWriteFailed(err.to_string()))?;
        Ok(entry)
    }
}
