//! File-backed catalogs
//!
//! JSON adapters for the [`RestaurantCatalog`](tablepick_application::RestaurantCatalog),
//! [`QuestionCatalog`](tablepick_application::QuestionCatalog) and
//! [`TagMappingStore`](tablepick_application::TagMappingStore) ports.

mod error;
mod questions;
mod restaurants;
mod tag_mappings;

pub use error::CatalogLoadError;
pub use questions::JsonQuestionCatalog;
pub use restaurants::{JsonRestaurantCatalog, VenueClassifier};
pub use tag_mappings::{ConfiguredTagMappings, FileTagMappingStore};
