//! Path management
//!
//! ## Path Resolution Order
//!
//! 1. `ACCOUNTING_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/accounting` or `~/.config/accounting`
//! 3. Windows: `%APPDATA%\accounting`

use std::path::PathBuf;

use crate::error::AccountingError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "ACCOUNTING_DATA_DIR";

/// Manages all paths used by the accounting service
#[derive(Debug, Clone)]
pub struct AccountingPaths {
    base_dir: PathBuf,
}

impl AccountingPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home/config directory can be determined.
    pub fn new() -> Result<Self, AccountingError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create paths under a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to accounts.json
    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.json")
    }

    /// Get the path to transactions.json
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), AccountingError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| AccountingError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| AccountingError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, AccountingError> {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join("accounting"));
    }
    let home = std::env::var("HOME")
        .map_err(|_| AccountingError::Config("Could not determine HOME directory".into()))?;
    Ok(PathBuf::from(home).join(".config").join("accounting"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, AccountingError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| AccountingError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("accounting"))
}
