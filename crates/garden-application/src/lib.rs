//! Application layer: the workshop flows a facilitator and participants drive.

pub mod suggestion_service;
pub mod views;
pub mod workshop_usecase;

pub use suggestion_service::SuggestionService;
pub use views::{
    ClusterOutcome, Dashboard, Deepening, NodeView, ParticipantView, ReflectionView,
    ResponseAnalysis, SessionSummary,
};
pub use workshop_usecase::{WorkshopUseCase, IMPORTED_TITLE_SUFFIX};
