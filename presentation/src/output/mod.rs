//! Output formatting for recommendations, room reports and questionnaires

pub mod console;
pub mod formatter;
