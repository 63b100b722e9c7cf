//! Integration tests for the tip service
//!
//! Drives the public library surface end to end: generation on a cold
//! cache, same-day idempotence, forced refreshes, retention trimming, and
//! persistence across restarts, all against a fake provider and a
//! temporary cache file.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use tipd::cache::CacheStore;
use tipd::provider::{Provider, ProviderError};
use tipd::tip::{RateLimiter, TipError, TipGenerator, TipService};

/// Provider that pops a scripted reply per call and counts calls.
struct ScriptedProvider {
    calls: AtomicUsize,
    replies: Mutex<VecDeque<Result<String, String>>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            replies: Mutex::new(replies.into_iter().collect()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .expect("provider called more times than scripted");
        reply.map_err(|message| ProviderError::Api {
            status: 502,
            message,
        })
    }
}

fn build_service(
    provider: Arc<ScriptedProvider>,
    temp_dir: &TempDir,
    history_size: usize,
) -> TipService {
    let store = CacheStore::open(temp_dir.path().join("tips.json"), history_size);
    let generator = TipGenerator::new(
        provider,
        Arc::new(RateLimiter::new(Duration::ZERO)),
        280,
    );
    TipService::new(store, generator)
}

#[tokio::test]
async fn test_cold_start_generates_then_serves_from_cache() {
    let temp_dir = TempDir::new().expect("temp dir");
    let provider = ScriptedProvider::new(vec![Ok("Drink water first thing.".into())]);
    let service = build_service(Arc::clone(&provider), &temp_dir, 7);

    assert!(service.history().is_empty());

    let first = service.daily_tip().await.expect("should generate");
    let second = service.daily_tip().await.expect("should hit the cache");
    let third = service.daily_tip().await.expect("should hit the cache");

    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_force_refresh_appends_a_second_entry_for_today() {
    let temp_dir = TempDir::new().expect("temp dir");
    let provider = ScriptedProvider::new(vec![
        Ok("Morning tip.".into()),
        Ok("Evening tip.".into()),
    ]);
    let service = build_service(Arc::clone(&provider), &temp_dir, 7);

    service.daily_tip().await.expect("should generate");
    service.force_refresh().await.expect("should regenerate");

    let history = service.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].date, history[1].date);

    // The newest entry wins the daily lookup.
    let today = service.daily_tip().await.expect("should hit the cache");
    assert_eq!(today.text, "Evening tip.");
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_retention_bound_holds_across_forced_refreshes() {
    let temp_dir = TempDir::new().expect("temp dir");
    let provider = ScriptedProvider::new(vec![
        Ok("one".into()),
        Ok("two".into()),
        Ok("three".into()),
        Ok("four".into()),
    ]);
    let service = build_service(Arc::clone(&provider), &temp_dir, 2);

    service.daily_tip().await.expect("should generate");
    for _ in 0..3 {
        service.force_refresh().await.expect("should regenerate");
    }

    let history = service.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "three");
    assert_eq!(history[1].text, "four");
}

#[tokio::test]
async fn test_history_survives_a_restart() {
    let temp_dir = TempDir::new().expect("temp dir");
    let provider = ScriptedProvider::new(vec![Ok("Stretch hourly.".into())]);

    let service = build_service(Arc::clone(&provider), &temp_dir, 7);
    let generated = service.daily_tip().await.expect("should generate");
    drop(service);

    // A fresh service over the same file serves the persisted tip without
    // touching the provider.
    let restarted = build_service(ScriptedProvider::new(vec![]), &temp_dir, 7);
    let served = restarted.daily_tip().await.expect("should hit the cache");

    assert_eq!(served, generated);
    assert_eq!(restarted.history(), vec![generated]);
}

#[tokio::test]
async fn test_oversized_generation_fails_without_cache_mutation() {
    let temp_dir = TempDir::new().expect("temp dir");
    let provider = ScriptedProvider::new(vec![Ok("x".repeat(500))]);
    let service = build_service(Arc::clone(&provider), &temp_dir, 7);

    let result = service.daily_tip().await;
    assert!(matches!(result, Err(TipError::InvalidContent(_))));
    assert!(service.history().is_empty());
}

#[tokio::test]
async fn test_provider_outage_then_recovery_within_the_same_day() {
    let temp_dir = TempDir::new().expect("temp dir");
    let provider = ScriptedProvider::new(vec![
        Err("gateway timeout".into()),
        Ok("Take the stairs today.".into()),
    ]);
    let service = build_service(Arc::clone(&provider), &temp_dir, 7);

    let outage = service.daily_tip().await;
    assert!(matches!(outage, Err(TipError::ProviderUnavailable(_))));
    assert!(service.history().is_empty());

    let recovered = service.daily_tip().await.expect("retry should generate");
    assert_eq!(recovered.text, "Take the stairs today.");
    assert_eq!(provider.calls(), 2);
}
