//! Locations of the garden's configuration files.
//!
//! ```text
//! ~/.config/garden/        # Config directory (platform dependent)
//! ├── config.toml          # Workshop and suggestion settings
//! └── secret.json          # API keys
//! ```

use garden_core::error::{GardenError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "garden";
const CONFIG_FILE: &str = "config.toml";
const SECRET_FILE: &str = "secret.json";

pub struct GardenPaths;

impl GardenPaths {
    /// The garden configuration directory (e.g. `~/.config/garden/`).
    ///
    /// # Errors
    ///
    /// `Config` if the platform has no config directory.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| GardenError::config("cannot determine the config directory"))
    }

    /// Path to `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Path to `secret.json`.
    pub fn secret_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(SECRET_FILE))
    }
}
