//! Loading of `config.toml`.

use crate::paths::GardenPaths;
use garden_core::config::GardenConfig;
use garden_core::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the garden configuration file.
///
/// A missing file is not an error: every setting has a default.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Storage for the default location (`~/.config/garden/config.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: GardenPaths::config_file()?,
        })
    }

    /// Storage for a custom path (for testing, or `--config`).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the configuration, falling back to defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// - `Io` if the file exists but cannot be read
    /// - `Serialization` if it is not valid TOML of the expected shape
    pub fn load(&self) -> Result<GardenConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(GardenConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config = toml::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), "config loaded");
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
