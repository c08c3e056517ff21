//! Port for publishing room state to a persistence sink.
//!
//! Defines the [`RoomPublisher`] trait through which the room actor writes the
//! merged answers, the shortlist, the live tally and the final result.
//!
//! This is separate from `tracing`-based diagnostics: tracing handles
//! human-readable messages, while this port records what members saw in a
//! machine-readable form. Delivery is at-least-once; the room reducer is
//! idempotent, so consumers may see a publication repeated.

use serde::Serialize;
use tablepick_domain::{Decision, MergedAnswers, RoomCode, RoomSummary, Shortlist, Tally};

/// One published fact about a room
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoomPublication {
    AnswersMerged { merged: MergedAnswers },
    ShortlistPublished { shortlist: Shortlist },
    TallyChanged { tally: Tally, voted: usize, total: usize },
    Finalized { decision: Decision },
    Summary { summary: RoomSummary },
    Abandoned,
}

impl RoomPublication {
    pub fn event_type(&self) -> &'static str {
        match self {
            RoomPublication::AnswersMerged { .. } => "answers_merged",
            RoomPublication::ShortlistPublished { .. } => "shortlist_published",
            RoomPublication::TallyChanged { .. } => "tally_changed",
            RoomPublication::Finalized { .. } => "finalized",
            RoomPublication::Summary { .. } => "summary",
            RoomPublication::Abandoned => "abandoned",
        }
    }
}

/// Port for publishing room state.
///
/// `publish` is synchronous and non-fallible so that a slow or broken sink
/// never stalls a room; adapters log their own failures.
pub trait RoomPublisher: Send + Sync {
    fn publish(&self, room: &RoomCode, publication: RoomPublication);
}

/// No-op implementation for tests and when publishing is disabled.
pub struct NoRoomPublisher;

impl RoomPublisher for NoRoomPublisher {
    fn publish(&self, _room: &RoomCode, _publication: RoomPublication) {}
}
