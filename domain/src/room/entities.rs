//! Room identity, phases, and decisions

use crate::core::error::DomainError;
use crate::ranking::Shortlist;
use crate::restaurant::RestaurantId;
use serde::{Deserialize, Serialize};

use super::tally::Tally;

/// Room identifier shared by every member (Value Object)
///
/// The code doubles as the seed for the room's shuffle and tie-break.
///
/// # Example
///
/// ```
/// use tablepick_domain::room::RoomCode;
///
/// let code = RoomCode::new(" ABCDEF ").unwrap();
/// assert_eq!(code.as_str(), "ABCDEF");
/// assert!(RoomCode::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidRoomCode(code));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Seed string for [`crate::ranking::seeded_shuffle`]
    pub fn seed(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoomCode::new(value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for RoomCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomCode::new(s)
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room member identifier (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidMemberId(id));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MemberId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MemberId::new(value)
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

impl std::str::FromStr for MemberId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemberId::new(s)
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phase of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomPhase {
    /// Members are answering the questionnaire
    #[default]
    Collecting,
    /// Merged answers are being ranked against the catalog
    Recommending,
    /// Shortlist installed, votes and swipes accepted
    Voting,
    Completed,
    Abandoned,
}

impl RoomPhase {
    pub fn as_str(&self) -> &str {
        match self {
            RoomPhase::Collecting => "collecting",
            RoomPhase::Recommending => "recommending",
            RoomPhase::Voting => "voting",
            RoomPhase::Completed => "completed",
            RoomPhase::Abandoned => "abandoned",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            RoomPhase::Collecting => "Collecting Answers",
            RoomPhase::Recommending => "Recommending",
            RoomPhase::Voting => "Voting",
            RoomPhase::Completed => "Completed",
            RoomPhase::Abandoned => "Abandoned",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RoomPhase::Completed | RoomPhase::Abandoned)
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// What a winning decision was based on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Votes,
    /// No votes were cast; swipe likes decided
    Likes,
    /// A member finalized an explicit choice
    Host,
}

/// Outcome of a completed room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    Winner {
        restaurant: RestaurantId,
        /// Votes, or likes when `source` is [`DecisionSource::Likes`]
        support: u32,
        /// More than one restaurant shared the top count
        tie_broken: bool,
        source: DecisionSource,
    },
    /// Nothing to decide from; callers should offer a retry
    NoResult,
}

impl Decision {
    pub fn winner(&self) -> Option<&RestaurantId> {
        match self {
            Decision::Winner { restaurant, .. } => Some(restaurant),
            Decision::NoResult => None,
        }
    }

    pub fn is_no_result(&self) -> bool {
        matches!(self, Decision::NoResult)
    }
}

/// Live state exposed to members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomView {
    pub code: RoomCode,
    pub phase: RoomPhase,
    pub members: Vec<MemberId>,
    /// Members with a submitted answer set
    pub answered: usize,
    pub shortlist: Option<Shortlist>,
    pub tally: Tally,
    pub voted: usize,
    pub total: usize,
    pub decision: Option<Decision>,
    /// Set once the room completes
    pub summary: Option<RoomSummary>,
}

/// Archive record produced once a room completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub code: RoomCode,
    pub member_count: usize,
    pub vote_count: usize,
    /// From room creation to completion
    pub latency_ms: u64,
    pub decision: Decision,
}
