use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use axum::http::HeaderValue;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store '{other}', expected redis or memory")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierBackend {
    Remote,
    Lexicon,
}

impl FromStr for ClassifierBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "remote" => Ok(ClassifierBackend::Remote),
            "lexicon" => Ok(ClassifierBackend::Lexicon),
            other => Err(format!(
                "unknown classifier '{other}', expected remote or lexicon"
            )),
        }
    }
}

/// CORS origin, `*` or one exact origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigin {
    Any,
    Exact(HeaderValue),
}

impl FromStr for AllowedOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s == "*" {
            return Ok(AllowedOrigin::Any);
        }

        if !(s.starts_with("http://") || s.starts_with("https://")) {
            return Err(format!("'{s}' is not * or an http(s) origin"));
        }

        HeaderValue::from_str(s)
            .map(AllowedOrigin::Exact)
            .map_err(|e| format!("'{s}' is not a valid header value: {e}"))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub store: StoreBackend,
    pub classifier: ClassifierBackend,
    pub inference_url: String,
    pub inference_timeout: Duration,
    pub inference_key: Option<String>,
    pub neutral_threshold: f64,
    pub max_review_chars: usize,
    pub max_batch: usize,
    pub allowed_origin: AllowedOrigin,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self {
            port: try_load("RUST_PORT", "1111")?,
            redis_url: try_load("REDIS_URL", "redis://redis:6379")?,
            store: try_load("STORE", "redis")?,
            classifier: try_load("CLASSIFIER", "remote")?,
            inference_url: try_load("INFERENCE_URL", "http://inference:8080/predict")?,
            inference_timeout: Duration::from_millis(try_load("INFERENCE_TIMEOUT_MS", "5000")?),
            inference_key: read_secret("INFERENCE_API_KEY"),
            neutral_threshold: try_load("NEUTRAL_THRESHOLD", "0.6")?,
            max_review_chars: try_load("MAX_REVIEW_CHARS", "5000")?,
            max_batch: try_load("MAX_BATCH", "50")?,
            allowed_origin: try_load("ALLOWED_ORIGIN", "*")?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Range checks that parsing alone does not cover.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.neutral_threshold) {
            return Err(ConfigError::Invalid {
                key: "NEUTRAL_THRESHOLD",
                reason: format!("{} is outside 0..=1", self.neutral_threshold),
            });
        }

        if self.inference_timeout.is_zero() {
            return Err(zero("INFERENCE_TIMEOUT_MS"));
        }

        if self.max_review_chars == 0 {
            return Err(zero("MAX_REVIEW_CHARS"));
        }

        if self.max_batch == 0 {
            return Err(zero("MAX_BATCH"));
        }

        Ok(())
    }
}

fn zero(key: &'static str) -> ConfigError {
    warn!("Invalid {key} value: 0");

    ConfigError::Invalid {
        key,
        reason: "must be greater than 0".to_string(),
    }
}

impl Default for Config {
    /// Offline settings: in-memory store and lexicon classifier.
    fn default() -> Self {
        Self {
            port: 1111,
            redis_url: "redis://redis:6379".to_string(),
            store: StoreBackend::Memory,
            classifier: ClassifierBackend::Lexicon,
            inference_url: "http://inference:8080/predict".to_string(),
            inference_timeout: Duration::from_millis(5000),
            inference_key: None,
            neutral_threshold: 0.6,
            max_review_chars: 5000,
            max_batch: 50,
            allowed_origin: AllowedOrigin::Any,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");

            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("No {secret_name} secret loaded: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
}
