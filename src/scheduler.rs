//! Daily tip refresh scheduling
//!
//! Runs a background task that fires once per day at a configured UTC hour
//! and asks the tip service for the daily tip. The task goes through the
//! same entry point a request handler would: when the day's tip already
//! exists the trigger is a cache hit and nothing is generated.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use tokio::sync::mpsc;
use tokio::time;

use crate::tip::TipService;

/// Handle for controlling the daily generation task
pub struct SchedulerHandle {
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl SchedulerHandle {
    /// Spawns the daily trigger task.
    ///
    /// # Arguments
    /// * `service` - The tip service the trigger calls into
    /// * `hour_utc` - UTC hour of day (0-23) at which to fire
    pub fn spawn(service: Arc<TipService>, hour_utc: u32) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let next = next_run_at(now, hour_utc);
                let wait = (next - now).to_std().unwrap_or_default();
                tracing::debug!(next = %next, "daily trigger scheduled");

                tokio::select! {
                    _ = time::sleep(wait) => {
                        match service.daily_tip().await {
                            Ok(entry) => {
                                tracing::info!(date = %entry.date, "daily tip ready");
                            }
                            Err(err) => {
                                tracing::warn!(error = %err, "scheduled tip generation failed");
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self { shutdown_tx }
    }

    /// Stops the background task.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Computes the next instant, strictly after `now`, at which the daily
/// trigger fires.
fn next_run_at(now: DateTime<Utc>, hour_utc: u32) -> DateTime<Utc> {
    // The hour is validated to 0-23 when configuration is parsed.
    let fire_time = NaiveTime::from_hms_opt(hour_utc, 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date_naive().and_time(fire_time).and_utc();
    if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(datetime: &str) -> DateTime<Utc> {
        datetime.parse().expect("valid test datetime")
    }

    #[test]
    fn test_next_run_is_today_when_hour_is_ahead() {
        let next = next_run_at(at("2025-06-01T05:30:00Z"), 7);
        assert_eq!(next, at("2025-06-01T07:00:00Z"));
    }

    #[test]
    fn test_next_run_is_tomorrow_when_hour_has_passed() {
        let next = next_run_at(at("2025-06-01T09:15:00Z"), 7);
        assert_eq!(next, at("2025-06-02T07:00:00Z"));
    }

    #[test]
    fn test_next_run_is_tomorrow_at_the_exact_hour() {
        let next = next_run_at(at("2025-06-01T07:00:00Z"), 7);
        assert_eq!(next, at("2025-06-02T07:00:00Z"));
    }

    #[test]
    fn test_next_run_handles_midnight_hour() {
        let next = next_run_at(at("2025-06-01T12:00:00Z"), 0);
        assert_eq!(next, at("2025-06-02T00:00:00Z"));
    }
}
