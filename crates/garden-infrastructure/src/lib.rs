//! Infrastructure layer for the causality garden.
//!
//! Holds the live session collection, the JSON export format with its
//! import and sample-bootstrap paths, and loading of configuration and
//! secrets from the user's config directory.

pub mod dto;
pub mod in_memory_session_repository;
pub mod paths;
pub mod sample;
pub mod storage;

pub use in_memory_session_repository::InMemorySessionRepository;
pub use paths::GardenPaths;
pub use storage::{ConfigStorage, SecretStorage};
