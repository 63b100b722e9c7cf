//! tipd - daily AI health tip service
//!
//! Generates one health tip per day through a text-generation provider,
//! keeps a bounded history on disk, and serves it over JSON-RPC 2.0.

use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tipd::cache::CacheStore;
use tipd::config::Config;
use tipd::provider::OpenAiClient;
use tipd::rpc;
use tipd::scheduler::SchedulerHandle;
use tipd::tip::{RateLimiter, TipGenerator, TipService};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tipd=info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = Config::parse();
    let cache_path = config.cache_path();

    let store = CacheStore::open(cache_path.clone(), config.history_size as usize);
    let provider = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.model_name.clone(),
    )?);
    let limiter = Arc::new(RateLimiter::new(config.min_call_interval()));
    let generator = TipGenerator::new(provider, limiter, config.max_tip_length_chars as usize);
    let service = Arc::new(TipService::new(store, generator));

    let scheduler = SchedulerHandle::spawn(Arc::clone(&service), config.daily_tip_hour_utc);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(
        addr = %config.bind,
        cache = %cache_path.display(),
        model = %config.model_name,
        "tipd listening"
    );

    let server = axum::serve(listener, rpc::router(Arc::clone(&service)));
    tokio::select! {
        result = server => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    scheduler.shutdown().await;
    Ok(())
}
