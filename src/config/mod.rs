use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::AccountingError,
    utils::{ensure_dir, paths},
};

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Runtime settings for the accounting core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Reconciliation tolerance for the balance-sheet difference check.
    pub rounding_epsilon: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_book: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "id-ID".into(),
            currency: "IDR".into(),
            rounding_epsilon: Decimal::new(1, 2),
            last_opened_book: None,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, AccountingError> {
        Self::from_base(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, AccountingError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, AccountingError> {
        ensure_dir(&base)?;
        let backups_dir = paths::config_backups_dir_in(&base);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: paths::config_file_in(&base),
            backups_dir,
        })
    }

    pub fn load(&self) -> Result<Config, AccountingError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data)
                .map_err(|err| AccountingError::Config(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), AccountingError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn backup(&self, config: &Config) -> Result<String, AccountingError> {
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let name = format!("config_{timestamp}.json");
        let json = serde_json::to_string_pretty(config)?;
        fs::write(self.backups_dir.join(&name), json)?;
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config, AccountingError> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(AccountingError::Config(format!(
                "configuration backup `{backup_name}` not found"
            )));
        }
        let data = fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|err| AccountingError::Config(err.to_string()))
    }

    pub fn list_backups(&self) -> Result<Vec<String>, AccountingError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
