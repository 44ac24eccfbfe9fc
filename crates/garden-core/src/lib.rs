//! Core domain for the causality garden.
//!
//! A facilitator seeds a root statement, participants add causal statements
//! beneath it, and the tree is later clustered into themes and reflected on.
//! This crate owns the tree and every valid mutation of it; text analysis is
//! reached only through the [`suggestion::SuggestionAdapter`] contract.

pub mod config;
pub mod error;
pub mod id;
pub mod repository;
pub mod session;
pub mod suggestion;

// Re-export common error type
pub use error::{GardenError, Result};
