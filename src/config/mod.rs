//! Site settings stored in `<data_dir>/config.toml`.
//!
//! Every section and every key is optional on disk; missing values fall back
//! to their defaults. Settings are loaded once by the caller and passed around
//! explicitly; nothing here caches them.
mod io;

pub use io::{config_path, load_config, save_config, CONFIG_FILE};

use crate::ordering::RetryPolicy;
use crate::sequencer::{Sequencer, DEFAULT_GAP};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed to serialize config TOML: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error("Invalid duration '{value}': {source}")]
    InvalidDuration {
        value: String,
        #[source]
        source: humantime::DurationError,
    },
}

fn default_gap() -> i64 {
    DEFAULT_GAP
}

fn default_max_attempts() -> u32 {
    2
}

/// `[sequencing]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencingConfig {
    #[serde(default = "default_gap")]
    pub gap: i64,
    /// Attempts per operation before a contended write is reported.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for SequencingConfig {
    fn default() -> Self {
        Self {
            gap: default_gap(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl SequencingConfig {
    #[must_use]
    pub fn sequencer(&self) -> Sequencer {
        Sequencer::new(self.gap)
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts)
    }
}

fn default_session_ttl() -> String {
    "24h".to_string()
}

/// `[auth]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Hex SHA-256 of the admin password. Login is refused while unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_sha256: Option<String>,
    /// Session lifetime in `humantime` syntax, e.g. `24h` or `90m`.
    #[serde(default = "default_session_ttl")]
    pub session_ttl: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_sha256: None,
            session_ttl: default_session_ttl(),
        }
    }
}

impl AuthConfig {
    pub fn session_ttl(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(&self.session_ttl).map_err(|source| {
            ConfigError::InvalidDuration {
                value: self.session_ttl.clone(),
                source,
            }
        })
    }
}

fn default_title() -> String {
    "Page Under Maintenance".to_string()
}

fn default_message() -> String {
    "We are making improvements to our site to give you a better experience.".to_string()
}

fn default_time_message() -> String {
    "We will be back in a few minutes".to_string()
}

fn default_footer_message() -> String {
    "Thank you for your patience and understanding.".to_string()
}

fn default_company_name() -> String {
    "Rojas Cala Asociados - Legal Advisory".to_string()
}

/// `[maintenance]` table: the public site shows a holding page while enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_message")]
    pub message: String,
    #[serde(default = "default_time_message")]
    pub time_message: String,
    #[serde(default = "default_footer_message")]
    pub footer_message: String,
    #[serde(default = "default_company_name")]
    pub company_name: String,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            title: default_title(),
            message: default_message(),
            time_message: default_time_message(),
            footer_message: default_footer_message(),
            company_name: default_company_name(),
        }
    }
}

/// A maintenance text field addressable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceField {
    Title,
    Message,
    TimeMessage,
    FooterMessage,
    CompanyName,
}

impl MaintenanceConfig {
    /// Set one text field. Blank input restores the default.
    pub fn set(&mut self, field: MaintenanceField, value: &str) {
        let value = value.trim();
        let (slot, default): (&mut String, fn() -> String) = match field {
            MaintenanceField::Title => (&mut self.title, default_title),
            MaintenanceField::Message => (&mut self.message, default_message),
            MaintenanceField::TimeMessage => (&mut self.time_message, default_time_message),
            MaintenanceField::FooterMessage => (&mut self.footer_message, default_footer_message),
            MaintenanceField::CompanyName => (&mut self.company_name, default_company_name),
        };
        *slot = if value.is_empty() {
            default()
        } else {
            value.to_string()
        };
    }
}

/// Top-level settings, deserialized from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdoConfig {
    #[serde(default)]
    pub sequencing: SequencingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
