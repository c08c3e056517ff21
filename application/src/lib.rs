//! Application layer for tablepick
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{RecommendParams, RoomParams};
pub use ports::{
    progress::{NoProgress, ProgressNotifier},
    question_catalog::QuestionCatalog,
    restaurant_catalog::{CatalogError, RestaurantCatalog},
    room_publisher::{NoRoomPublisher, RoomPublication, RoomPublisher},
    tag_mapping_store::{StaticTagMappings, TagMappingStore},
};
pub use use_cases::ingest_answers::{
    AnswersDocument, IngestAnswersUseCase, IngestError, IngestedAnswers, MemberSubmission,
};
pub use use_cases::recommend::{
    RecommendError, RecommendInput, RecommendUseCase, Recommendations,
};
pub use use_cases::room_directory::{RoomDirectory, RoomError, RoomHandle, now_ms};
pub use use_cases::simulate_room::{
    RoomScript, ScriptAction, ScriptStep, SimulateError, SimulateRoomUseCase, SimulationReport,
    StepOutcome,
};
