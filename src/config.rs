// src/config.rs

use crate::errors::ConfigError;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the directory API serving `/organizations`, `/cbos`, `/meal_providers`.
    pub api_base: String,
    pub http_timeout: Duration,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(base) = lookup("MEALMAP_API_BASE").filter(|v| !v.trim().is_empty()) {
            config.api_base = base.trim().to_string();
        }

        if let Some(raw) = lookup("MEALMAP_HTTP_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::Invalid {
                    key: "MEALMAP_HTTP_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("MEALMAP_LOG_JSON") {
            config.log_json = parse_bool(&raw).ok_or(ConfigError::Invalid {
                key: "MEALMAP_LOG_JSON",
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
