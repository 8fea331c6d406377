use anyhow::{bail, Context, Result};
use std::time::Duration;

use crate::constants::{DEFAULT_REQUEST_TIMEOUT, NWS_API_BASE, USER_AGENT};

pub const ENV_API_BASE: &str = "WEATHER_API_BASE";
pub const ENV_USER_AGENT: &str = "WEATHER_USER_AGENT";
pub const ENV_REQUEST_TIMEOUT: &str = "WEATHER_REQUEST_TIMEOUT_SECS";

/// Runtime settings for the upstream client
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: NWS_API_BASE.to_string(),
            user_agent: USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Config {
    /// Reads overrides from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_API_BASE) {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = agent;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_REQUEST_TIMEOUT} must be a whole number of seconds, got {raw:?}"))?;
            if secs == 0 {
                bail!("{ENV_REQUEST_TIMEOUT} must be greater than zero");
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
