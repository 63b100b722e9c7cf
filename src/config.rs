//! Service configuration
//!
//! Every setting can be supplied as a command-line flag or an environment
//! variable; flags win. Validation of ranges happens at parse time so the
//! rest of the service can trust the values.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use directories::ProjectDirs;

/// Daily AI health tip service
#[derive(Parser, Debug, Clone)]
#[command(name = "tipd")]
#[command(about = "Serves one AI-generated daily health tip over JSON-RPC")]
#[command(version)]
pub struct Config {
    /// Model name passed through to the completion provider
    #[arg(long, env = "MODEL_NAME", default_value = "gpt-4o-mini")]
    pub model_name: String,

    /// API key for the completion provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Path of the tip history file (defaults to the platform cache directory)
    #[arg(long, env = "CACHE_FILE")]
    pub cache_file: Option<PathBuf>,

    /// Number of tips retained in the history
    #[arg(long, env = "HISTORY_SIZE", default_value_t = 7,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub history_size: u32,

    /// UTC hour of day at which the scheduled daily generation fires
    #[arg(long, env = "DAILY_TIP_HOUR_UTC", default_value_t = 7,
          value_parser = clap::value_parser!(u32).range(0..=23))]
    pub daily_tip_hour_utc: u32,

    /// Minimum number of seconds between completion calls
    #[arg(long, env = "MIN_OPENAI_CALL_INTERVAL", default_value_t = 3.0)]
    pub min_openai_call_interval: f64,

    /// Maximum accepted tip length in characters
    #[arg(long, env = "MAX_TIP_LENGTH_CHARS", default_value_t = 280,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tip_length_chars: u32,

    /// Address the JSON-RPC server listens on
    #[arg(long, env = "TIPD_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,
}

impl Config {
    /// Resolves the history file path, falling back to the platform cache
    /// directory (`~/.cache/tipd/tips.json` on Linux).
    pub fn cache_path(&self) -> PathBuf {
        if let Some(path) = &self.cache_file {
            return path.clone();
        }
        ProjectDirs::from("", "", "tipd")
            .map(|dirs| dirs.cache_dir().join("tips.json"))
            .unwrap_or_else(|| PathBuf::from("tips.json"))
    }

    /// Minimum interval between completion calls as a `Duration`.
    ///
    /// Negative or non-finite values collapse to zero.
    pub fn min_call_interval(&self) -> Duration {
        let secs = self.min_openai_call_interval;
        if secs.is_finite() && secs > 0.0 {
            Duration::from_secs_f64(secs)
        } else {
            Duration::ZERO
        }
    }
}
