//! Runtime configuration.
//!
//! Values are resolved from command-line flags first, then environment
//! variables, then built-in defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::{data_dir, StorePaths};
use crate::error::{Result, StatsError};

pub const DATA_DIR_ENV_VAR: &str = "FOOTBALL_STATS_DATA_DIR";
pub const API_URL_ENV_VAR: &str = "FOOTBALL_STATS_API_URL";
pub const BIND_ENV_VAR: &str = "FOOTBALL_STATS_BIND";
pub const PORT_ENV_VAR: &str = "FOOTBALL_STATS_PORT";
pub const TIMEOUT_ENV_VAR: &str = "FOOTBALL_STATS_TIMEOUT_SECS";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding `wide.db`, `documents.db` and `graph.db`.
    pub data_dir: PathBuf,
    /// Base URL of the REST service, used by the console.
    pub api_url: String,
    pub bind: String,
    pub port: u16,
    /// Applies to both the server request timeout and the HTTP client.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: data_dir(),
            api_url: format!("http://{}:{}", DEFAULT_BIND, DEFAULT_PORT),
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup(DATA_DIR_ENV_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let bind = lookup(BIND_ENV_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.bind);
        let port = parse_var(&lookup, PORT_ENV_VAR, defaults.port)?;
        let timeout_secs = parse_var(&lookup, TIMEOUT_ENV_VAR, defaults.timeout_secs)?;
        let api_url = lookup(API_URL_ENV_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| format!("http://{}:{}", bind, port));

        let settings = Self {
            data_dir,
            api_url: api_url.trim_end_matches('/').to_string(),
            bind,
            port,
            timeout_secs,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line overrides on top of the resolved values.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, api_url: Option<String>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(url) = api_url {
            self.api_url = url.trim_end_matches('/').to_string();
        }
        self
    }

    pub fn store_paths(&self) -> StorePaths {
        StorePaths::in_dir(&self.data_dir)
    }

    /// Socket address the REST service listens on.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| StatsError::Config {
                message: format!("invalid listen address {}:{}: {}", self.bind, self.port, e),
            })
    }

    fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(StatsError::Config {
                message: format!("{} must be an http(s) URL, got '{}'", API_URL_ENV_VAR, self.api_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(StatsError::Config {
                message: format!("{} must be greater than zero", TIMEOUT_ENV_VAR),
            });
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|e: T::Err| StatsError::Config {
                message: format!("{}='{}': {}", key, raw, e),
            })
        }
        _ => Ok(default),
    }
}
