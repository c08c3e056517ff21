//! Room actor parameters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomParams {
    /// Capacity of each room's event inbox
    pub inbox_capacity: usize,
    /// Question mode used to classify answers submitted to a room
    pub question_mode: Option<String>,
}

impl Default for RoomParams {
    fn default() -> Self {
        Self {
            inbox_capacity: 64,
            question_mode: None,
        }
    }
}

impl RoomParams {
    pub fn with_inbox_capacity(mut self, capacity: usize) -> Self {
        self.inbox_capacity = capacity.max(1);
        self
    }

    pub fn with_question_mode(mut self, mode: impl Into<String>) -> Self {
        self.question_mode = Some(mode.into());
        self
    }
}
