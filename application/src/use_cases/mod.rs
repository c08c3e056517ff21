//! Use cases (application services)
//!
//! Each use case orchestrates domain logic through the ports.

pub mod ingest_answers;
pub mod recommend;
pub mod room_directory;
pub mod simulate_room;
