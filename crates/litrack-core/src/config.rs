//! Configuration for litrack-core
//!
//! Connection parameters for the document store, the shared gate secret,
//! the team roster and sync retry settings. Loaded from the process
//! environment at startup or from JSON.

use litrack_domain::Roster;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LitrackConfig {
    /// Document store connection
    pub store: StoreConfig,
    /// Shared password checked by the access gate
    pub shared_secret: String,
    /// Persons in charge an entry can be assigned to
    #[serde(default)]
    pub team: Roster,
    /// Subscription/identity behaviour
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Connection parameters for the managed document store.
///
/// All six are required; the core never interprets them beyond passing them
/// to the store client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

/// Sync controller behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Collection holding the entries
    pub collection: String,
    /// Identity acquisition attempts before giving up (at least 1)
    pub identity_attempts: u32,
    /// Delay between identity attempts in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            collection: "literature".to_string(),
            identity_attempts: 3,
            retry_backoff_ms: 500,
        }
    }
}

pub const ENV_API_KEY: &str = "LITRACK_API_KEY";
pub const ENV_AUTH_DOMAIN: &str = "LITRACK_AUTH_DOMAIN";
pub const ENV_PROJECT_ID: &str = "LITRACK_PROJECT_ID";
pub const ENV_STORAGE_BUCKET: &str = "LITRACK_STORAGE_BUCKET";
pub const ENV_MESSAGING_SENDER_ID: &str = "LITRACK_MESSAGING_SENDER_ID";
pub const ENV_APP_ID: &str = "LITRACK_APP_ID";
pub const ENV_PASSWORD: &str = "LITRACK_PASSWORD";
pub const ENV_TEAM: &str = "LITRACK_TEAM";
pub const ENV_IDENTITY_ATTEMPTS: &str = "LITRACK_IDENTITY_ATTEMPTS";
pub const ENV_RETRY_BACKOFF_MS: &str = "LITRACK_RETRY_BACKOFF_MS";

impl LitrackConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let store = StoreConfig {
            api_key: require(ENV_API_KEY)?,
            auth_domain: require(ENV_AUTH_DOMAIN)?,
            project_id: require(ENV_PROJECT_ID)?,
            storage_bucket: require(ENV_STORAGE_BUCKET)?,
            messaging_sender_id: require(ENV_MESSAGING_SENDER_ID)?,
            app_id: require(ENV_APP_ID)?,
        };
        let shared_secret = require(ENV_PASSWORD)?;

        let team = get(ENV_TEAM)
            .map(|list| Roster::parse_list(&list))
            .unwrap_or_default();

        let mut sync = SyncConfig::default();
        if let Some(raw) = get(ENV_IDENTITY_ATTEMPTS) {
            sync.identity_attempts = parse_number(ENV_IDENTITY_ATTEMPTS, &raw)?;
        }
        if let Some(raw) = get(ENV_RETRY_BACKOFF_MS) {
            sync.retry_backoff_ms = parse_number(ENV_RETRY_BACKOFF_MS, &raw)?;
        }

        let config = Self {
            store,
            shared_secret,
            team,
            sync,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shared_secret.is_empty() {
            return Err(ConfigError::Missing(ENV_PASSWORD));
        }

        if self.sync.identity_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: ENV_IDENTITY_ATTEMPTS,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.sync.collection.is_empty() {
            return Err(ConfigError::Invalid {
                name: "collection",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("expected a number, got {raw:?}"),
    })
}
