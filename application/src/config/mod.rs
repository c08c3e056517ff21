//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`RecommendParams`]: scoring weights, ranking options, shortlist sizes, merge rule
//! - [`RoomParams`]: room actor inbox and question mode

pub mod recommend_params;
pub mod room_params;

pub use recommend_params::RecommendParams;
pub use room_params::RoomParams;
