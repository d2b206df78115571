//! Configuration for Engager.
//!
//! Loaded once at startup from YAML with a fallback chain:
//! 1. Explicit path if provided
//! 2. ~/.config/engager/engager.yml (user config)
//! 3. ./engager.yml (working directory)
//! 4. Default values
//!
//! Credentials can be supplied or overridden through `ENGAGER_USERNAME` and
//! `ENGAGER_PASSWORD`. Validation runs separately, before any network call.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

mod env;
mod validate;

pub use env::{ENV_PASSWORD, ENV_USERNAME};
pub use validate::MAX_COMMENT_LENGTH;

use crate::scheduler::{ConsumerConfig, FeedConfig, PacingConfig, RateLimitConfig};
use crate::session::DEFAULT_MAX_CHALLENGE_ATTEMPTS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub username: String,
    pub password: String,
    /// Candidate comment texts, one is picked at random per item
    pub comments: Vec<String>,
    /// Only engage with these accounts (empty = everyone)
    pub allow_users: Vec<String>,
    /// Never engage with these accounts
    pub deny_users: Vec<String>,
    pub pacing: PacingConfig,
    pub feed: FeedConfig,
    pub rate_limit: RateLimitConfig,
    pub consumer: ConsumerConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub max_challenge_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_challenge_attempts: DEFAULT_MAX_CHALLENGE_ATTEMPTS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            username: String::new(),
            password: String::new(),
            comments: Vec::new(),
            allow_users: Vec::new(),
            deny_users: Vec::new(),
            pacing: PacingConfig::default(),
            feed: FeedConfig::default(),
            rate_limit: RateLimitConfig::default(),
            consumer: ConsumerConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file(config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir
                .join(project_name)
                .join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!(
                            "Failed to load config from {}: {}",
                            primary_config.display(),
                            e
                        );
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Copy of the config safe to print
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.password.is_empty() {
            copy.password = "********".to_string();
        }
        copy
    }
}
