//! Events fed into a room, the effects they produce, and rejections

use super::entities::{Decision, MemberId, RoomPhase};
use super::tally::Tally;
use crate::consensus::MergedAnswers;
use crate::questionnaire::AnswerSet;
use crate::ranking::Shortlist;
use crate::restaurant::RestaurantId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input to [`super::Room::apply`]
///
/// The first three mirror the real-time change feed; the rest are commands
/// from members or from the room actor itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// Authoritative member list; replaces the previous one
    MemberListChanged { members: Vec<MemberId> },
    /// A member's full answer set; resubmission replaces the earlier one
    AnswersSubmitted { member: MemberId, answers: AnswerSet },
    /// `None` withdraws the member's vote
    VoteChanged {
        member: MemberId,
        restaurant: Option<RestaurantId>,
    },
    Swiped {
        member: MemberId,
        restaurant: RestaurantId,
        liked: bool,
    },
    RecommendationsRequested,
    ShortlistReady { shortlist: Shortlist },
    /// `choice: None` resolves from the tally
    FinalizeRequested { choice: Option<RestaurantId> },
    RetryVoting,
    Abandon,
}

impl RoomEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            RoomEvent::MemberListChanged { .. } => "member_list_changed",
            RoomEvent::AnswersSubmitted { .. } => "answers_submitted",
            RoomEvent::VoteChanged { .. } => "vote_changed",
            RoomEvent::Swiped { .. } => "swiped",
            RoomEvent::RecommendationsRequested => "recommendations_requested",
            RoomEvent::ShortlistReady { .. } => "shortlist_ready",
            RoomEvent::FinalizeRequested { .. } => "finalize_requested",
            RoomEvent::RetryVoting => "retry_voting",
            RoomEvent::Abandon => "abandon",
        }
    }
}

/// Work the caller must carry out after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEffect {
    PhaseChanged { from: RoomPhase, to: RoomPhase },
    /// Rank the catalog against these answers and send back `ShortlistReady`
    ShortlistRequested { merged: MergedAnswers },
    ShortlistInstalled(Shortlist),
    TallyChanged { tally: Tally, voted: usize, total: usize },
    Finalized(Decision),
    Abandoned,
}

/// Event refused without changing the room
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomRejection {
    #[error("Room already finalized")]
    Finalized,

    #[error("Room was abandoned")]
    Abandoned,

    #[error("Voting is not open (phase: {0})")]
    VotingNotOpen(RoomPhase),

    #[error("Answers are closed (phase: {0})")]
    AnswersClosed(RoomPhase),

    #[error("Restaurant '{0}' is not on the shortlist")]
    UnknownRestaurant(RestaurantId),

    #[error("Nothing to retry: the room has a winner")]
    NothingToRetry,
}
