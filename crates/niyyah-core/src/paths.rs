use crate::error::{NiyyahError, Result};
use std::path::{Path, PathBuf};

pub const HOME_DIR_NAME: &str = ".niyyah";
pub const CONFIG_FILE: &str = "config.yaml";
pub const SESSION_FILE: &str = "session.yaml";

/// `~/.niyyah`, the default location for config and session files.
pub fn default_home() -> Result<PathBuf> {
    home::home_dir()
        .map(|h| h.join(HOME_DIR_NAME))
        .ok_or(NiyyahError::HomeNotFound)
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}

pub fn session_path(home: &Path) -> PathBuf {
    home.join(SESSION_FILE)
}
