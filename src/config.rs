//! Runtime configuration read from the environment.
//!
//! Values may also come from a `.env` file, loaded by `main` through
//! `dotenvy` before [`AppConfig::from_env`] runs.

use std::fmt;

use crate::models::vote_result::VotePolicy;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_MEETING_LOCATION: &str = "Municipal Council Hall";
pub const DEFAULT_AUDIT_MAX_ENTRIES: usize = 1000;

#[derive(Debug)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value, reason } => {
                write!(f, "Invalid value {value:?} for {key}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub vote_policy: VotePolicy,
    pub default_location: String,
    pub audit_max_entries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            vote_policy: VotePolicy::default(),
            default_location: DEFAULT_MEETING_LOCATION.to_string(),
            audit_max_entries: DEFAULT_AUDIT_MAX_ENTRIES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Unset or blank
    /// keys fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = AppConfig::default();

        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr.trim().to_string();
        }

        if let Some(raw) = get("QUORUM_THRESHOLD") {
            let threshold: i64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "QUORUM_THRESHOLD",
                value: raw.clone(),
                reason: format!("{e}"),
            })?;
            if threshold < 0 {
                return Err(ConfigError::Invalid {
                    key: "QUORUM_THRESHOLD",
                    value: raw,
                    reason: "must not be negative".to_string(),
                });
            }
            config.vote_policy.quorum_threshold = threshold;
        }

        if let Some(raw) = get("VOTE_REQUIRED_CATEGORIES") {
            config.vote_policy.vote_required_categories = raw
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(location) = get("DEFAULT_MEETING_LOCATION") {
            config.default_location = location.trim().to_string();
        }

        if let Some(raw) = get("AUDIT_MAX_ENTRIES") {
            let max: usize = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "AUDIT_MAX_ENTRIES",
                value: raw.clone(),
                reason: format!("{e}"),
            })?;
            if max == 0 {
                log::warn!("AUDIT_MAX_ENTRIES=0 disables the audit trail");
            }
            config.audit_max_entries = max;
        }

        Ok(config)
    }
}
