//! Application configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server port
    pub server_port: u16,
    pub random_source: RandomSourceConfig,
}

/// Settings for the external random number service and its resilience policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomSourceConfig {
    /// Base URL of the random number service
    pub base_url: String,
    /// Timeout of a single HTTP call
    pub timeout: Duration,
    /// Retries after the first failed attempt
    pub retry_count: u32,
    /// Consecutive failures that open the circuit
    pub breaker_failure_threshold: u32,
    /// How long an open circuit rejects calls
    pub breaker_open_duration: Duration,
    /// Generate numbers locally when the service cannot be used
    pub fallback_enabled: bool,
    pub fallback_min: u32,
    pub fallback_max: u32,
}

impl Default for RandomSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://codechallenge.boohma.com".to_string(),
            timeout: Duration::from_secs(30),
            retry_count: 3,
            breaker_failure_threshold: 3,
            breaker_open_duration: Duration::from_secs(30),
            fallback_enabled: true,
            fallback_min: 1,
            fallback_max: 100,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = RandomSourceConfig::default();

        let random_source = RandomSourceConfig {
            base_url: lookup("RANDOM_SERVICE_BASE_URL").unwrap_or(defaults.base_url),
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "RANDOM_SERVICE_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?),
            retry_count: parse_or(&lookup, "RANDOM_SERVICE_RETRY_COUNT", defaults.retry_count)?,
            breaker_failure_threshold: parse_or(
                &lookup,
                "CIRCUIT_BREAKER_FAILURE_THRESHOLD",
                defaults.breaker_failure_threshold,
            )?,
            breaker_open_duration: Duration::from_secs(parse_or(
                &lookup,
                "CIRCUIT_BREAKER_OPEN_SECS",
                defaults.breaker_open_duration.as_secs(),
            )?),
            fallback_enabled: parse_or(
                &lookup,
                "RANDOM_FALLBACK_ENABLED",
                defaults.fallback_enabled,
            )?,
            fallback_min: parse_or(&lookup, "RANDOM_FALLBACK_MIN", defaults.fallback_min)?,
            fallback_max: parse_or(&lookup, "RANDOM_FALLBACK_MAX", defaults.fallback_max)?,
        };
        random_source.validate()?;

        Ok(Self {
            server_port: parse_or(&lookup, "SERVER_PORT", 3000)?,
            random_source,
        })
    }
}

impl RandomSourceConfig {
    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("RANDOM_SERVICE_BASE_URL must be an http(s) URL");
        }
        if self.timeout.is_zero() {
            bail!("RANDOM_SERVICE_TIMEOUT_SECS must be at least 1");
        }
        if self.breaker_failure_threshold == 0 {
            bail!("CIRCUIT_BREAKER_FAILURE_THRESHOLD must be at least 1");
        }
        if self.fallback_min == 0 || self.fallback_min > self.fallback_max {
            bail!("RANDOM_FALLBACK_MIN must be at least 1 and not above RANDOM_FALLBACK_MAX");
        }
        Ok(())
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
