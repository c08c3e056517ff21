//! Infrastructure layer for tablepick
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: JSON catalogs for restaurants, questions and
//! tag mappings, the TOML configuration loader, and the JSONL room publisher.

pub mod catalog;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use catalog::{
    CatalogLoadError, ConfiguredTagMappings, FileTagMappingStore, JsonQuestionCatalog,
    JsonRestaurantCatalog, VenueClassifier,
};
pub use config::{ConfigLoader, FileConfig};
pub use logging::JsonlRoomPublisher;
