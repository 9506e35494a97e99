//! Environment-driven server configuration.
//!
//! Unset, unparsable or out-of-range values fall back to defaults. The only
//! error is failing to resolve the working directory for the default log dir.

use quotes_core::{default_log_level, normalize_level, EvictorConfig};
use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:3939";
pub const DEFAULT_SEED_COUNT: usize = 5;

const ENV_BIND: &str = "QUOTES_HTTP_BIND";
const ENV_LOG_LEVEL: &str = "QUOTES_LOG_LEVEL";
const ENV_LOG_DIR: &str = "QUOTES_LOG_DIR";
const ENV_SWEEP_INTERVAL_SECS: &str = "QUOTES_SWEEP_INTERVAL_SECS";
const ENV_MAX_AGE_SECS: &str = "QUOTES_MAX_AGE_SECS";
const ENV_SEED_COUNT: &str = "QUOTES_SEED_COUNT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NoWorkingDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoWorkingDir(reason) => {
                write!(f, "cannot resolve default log directory: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    pub evictor: EvictorConfig,
    /// Number of demo quotes inserted at startup.
    pub seed_count: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = lookup(ENV_BIND)
            .and_then(|value| value.trim().parse::<SocketAddr>().ok())
            .unwrap_or_else(default_bind);

        let log_level = lookup(ENV_LOG_LEVEL)
            .and_then(|value| normalize_level(&value).ok())
            .unwrap_or_else(default_log_level)
            .to_string();

        let log_dir = match lookup(ENV_LOG_DIR).map(PathBuf::from) {
            Some(dir) if dir.is_absolute() => dir,
            _ => env::current_dir()
                .map_err(|err| ConfigError::NoWorkingDir(err.to_string()))?
                .join("logs"),
        };

        let defaults = EvictorConfig::default();
        let interval = parse_secs(&lookup, ENV_SWEEP_INTERVAL_SECS, 1..=86_400)
            .unwrap_or(defaults.interval);
        let max_age =
            parse_secs(&lookup, ENV_MAX_AGE_SECS, 1..=30 * 86_400).unwrap_or(defaults.max_age);

        let seed_count = lookup(ENV_SEED_COUNT)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|value| *value <= 10_000)
            .unwrap_or(DEFAULT_SEED_COUNT);

        Ok(Self {
            bind,
            log_level,
            log_dir,
            evictor: EvictorConfig { interval, max_age },
            seed_count,
        })
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3939))
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    range: std::ops::RangeInclusive<u64>,
) -> Option<Duration> {
    lookup(key)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| range.contains(value))
        .map(Duration::from_secs)
}
