//! Loading of `secret.json`.
//!
//! The file is read-only from the garden's point of view and should be kept
//! with restrictive permissions (e.g. 600).

use crate::paths::GardenPaths;
use garden_core::config::SecretConfig;
use garden_core::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Storage for the default location (`~/.config/garden/secret.json`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: GardenPaths::secret_file()?,
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the secrets, or `None` when the file does not exist.
    ///
    /// # Errors
    ///
    /// - `Io` if the file exists but cannot be read
    /// - `Serialization` if it is not valid JSON
    pub fn load(&self) -> Result<Option<SecretConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
