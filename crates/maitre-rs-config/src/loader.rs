//! JSON5 config file loading.

use crate::{ConfigError, MaitreConfig};
use directories::UserDirs;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename.
const DEFAULT_CONFIG_FILE: &str = "maitre.json5";
/// Default config directory under the user home.
const DEFAULT_CONFIG_DIR: &str = ".maitre";

/// Default user config path (`~/.maitre/maitre.json5`).
pub fn default_user_config_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE),
    )
}

/// Parse and validate a config from JSON5 text.
pub fn load_from_str(contents: &str) -> Result<MaitreConfig, ConfigError> {
    let config: MaitreConfig = json5::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a config file from disk.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<MaitreConfig, ConfigError> {
    let path = path.as_ref();
    debug!("loading config (path={})", path.display());
    let contents = fs::read_to_string(path)?;
    load_from_str(&contents)
}

/// Load the user config when present, falling back to defaults.
pub fn load_or_default() -> Result<MaitreConfig, ConfigError> {
    match default_user_config_path() {
        Some(path) if path.exists() => {
            info!("using user config (path={})", path.display());
            load_from_path(path)
        }
        _ => {
            debug!("no user config found, using defaults");
            Ok(MaitreConfig::default())
        }
    }
}
