use anyhow::{Context, Result};
use garden_application::{SuggestionService, WorkshopUseCase};
use garden_core::config::GardenConfig;
use garden_infrastructure::{ConfigStorage, InMemorySessionRepository};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Loads `config.toml` from `path`, or from the user config directory.
pub fn load_config(path: Option<&Path>) -> Result<GardenConfig> {
    let storage = match path {
        Some(path) => ConfigStorage::with_path(path),
        None => ConfigStorage::new().context("Failed to locate the config directory")?,
    };
    storage
        .load()
        .with_context(|| format!("Failed to load {}", storage.path().display()))
}

/// A fresh in-process workshop wired to the configured collaborator.
pub fn build_usecase(config: &GardenConfig) -> WorkshopUseCase {
    WorkshopUseCase::new(
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(SuggestionService::from_config(config)),
        config.workshop.clone(),
    )
}

/// Builds a workshop and imports the session stored at `file` into it.
pub async fn open_session(config: &GardenConfig, file: &Path) -> Result<(WorkshopUseCase, String)> {
    let usecase = build_usecase(config);
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let session_id = usecase
        .import_session(&json)
        .await
        .with_context(|| format!("Failed to import {}", file.display()))?;
    tracing::debug!(file = %file.display(), session_id = %session_id, "session opened");
    Ok((usecase, session_id))
}

/// Writes an export to `out`, or to stdout.
pub fn write_output(out: Option<&Path>, json: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Saved session to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
