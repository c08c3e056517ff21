//! Progress display for room replays

pub mod reporter;
