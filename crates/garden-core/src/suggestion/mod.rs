//! Suggestion collaborator contract.
//!
//! - `adapter`: the `SuggestionAdapter` trait and the always-failing `UnavailableAdapter`
//! - `model`: request/response shapes (`IdeaSplit`, `ClusterSuggestions`, ...)
//! - `heuristics`: the local vagueness check, canned fallbacks, sentence splitting

mod adapter;
pub mod heuristics;
mod model;

pub use adapter::{SuggestionAdapter, UnavailableAdapter};
pub use model::{
    ClusterSuggestion, ClusterSuggestions, ClusterSummary, Idea, IdeaSplit, IdeaType,
    ReflectionSummary, VaguenessCheck,
};
