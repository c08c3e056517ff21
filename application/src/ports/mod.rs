//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod progress;
pub mod question_catalog;
pub mod restaurant_catalog;
pub mod room_publisher;
pub mod tag_mapping_store;
