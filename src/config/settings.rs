//! Service settings
//!
//! Persisted as `config.json`. Every field has a serde default so older or
//! hand-written files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::AccountingPaths;
use crate::error::AccountingError;
use crate::models::BankId;

/// How to reach the external security validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityValidatorSettings {
    /// Base URL of the validator
    #[serde(default = "default_validator_url")]
    pub url: String,

    /// URL the validator reports its verdict to
    #[serde(default = "default_callback_url")]
    pub callback_url: String,

    /// Number of background workers dispatching checks
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// HTTP timeout for one check, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SecurityValidatorSettings {
    fn default() -> Self {
        Self {
            url: default_validator_url(),
            callback_url: default_callback_url(),
            workers: default_workers(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings handed to the account lifecycle manager
#[derive(Debug, Clone)]
pub struct AccountConfig {
    pub bank_id: BankId,
    pub callback_url: String,
}

/// Service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Id of the bank issuing the accounts
    #[serde(default)]
    pub bank_id: BankId,

    #[serde(default)]
    pub security_validator: SecurityValidatorSettings,

    /// Default tracing filter when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_validator_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_callback_url() -> String {
    "http://localhost:8080/api/v1/accounts/create".to_string()
}

fn default_workers() -> usize {
    2
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_filter() -> String {
    "accounting=info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            bank_id: BankId::default(),
            security_validator: SecurityValidatorSettings::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &AccountingPaths) -> Result<Self, AccountingError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| AccountingError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            AccountingError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AccountingPaths) -> Result<(), AccountingError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AccountingError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| AccountingError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), AccountingError> {
        self.bank_id
            .validate()
            .map_err(|_| AccountingError::Config(format!("bank_id {} must have 16 digits", self.bank_id)))?;

        if self.security_validator.workers == 0 {
            return Err(AccountingError::Config(
                "security_validator.workers must be at least 1".into(),
            ));
        }

        Ok(())
    }

    pub fn account_config(&self) -> AccountConfig {
        AccountConfig {
            bank_id: self.bank_id,
            callback_url: self.security_validator.callback_url.clone(),
        }
    }
}
