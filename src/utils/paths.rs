use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".sitebooks";
const BOOKS_DIR: &str = "books";
const BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";
const CONFIG_BACKUP_DIR: &str = "config_backups";
const STATE_FILE: &str = "state.json";

/// Returns the application data directory, defaulting to `~/.sitebooks`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("SITEBOOKS_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding managed book files, under `base`.
pub fn books_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(BOOKS_DIR)
}

/// Base directory for backup snapshots, under `base`.
pub fn backups_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

/// Path of the active configuration file, under `base`.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Directory containing configuration backups, under `base`.
pub fn config_backups_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_BACKUP_DIR)
}

/// Path to the shared state file (last opened book, etc.), under `base`.
pub fn state_file_in(base: &std::path::Path) -> PathBuf {
    base.join(STATE_FILE)
}
