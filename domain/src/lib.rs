//! Domain layer for tablepick
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Scoring
//!
//! Each restaurant is scored against one answer set: basic answers act as hard
//! filters on restaurant attributes, fun answers add partial credit through a
//! tag mapping, and rating, popularity and distance add capped boosts.
//!
//! ## Rooms
//!
//! A group shares one room. Members' answers are merged by question
//! ([`consensus`]), the catalog is ranked against the merged set ([`ranking`]),
//! and members vote on a shortlist until the room reaches a decision
//! ([`room`]). Ties are broken by a shuffle seeded from the room code, so every
//! member sees the same outcome.

pub mod config;
pub mod consensus;
pub mod core;
pub mod questionnaire;
pub mod ranking;
pub mod restaurant;
pub mod room;
pub mod scoring;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{ConsensusAggregator, ConsensusRule, MergedAnswers, SelectionCounts};
pub use core::error::DomainError;
pub use questionnaire::{
    Answer, AnswerKey, AnswerSet, BasicAnswer, BasicAttribute, Choice, Question, QuestionKind,
    Questionnaire, RawAnswer,
};
pub use ranking::{RankOptions, Ranking, RecommendationRanker, ScoredRestaurant, Shortlist};
pub use restaurant::{GeoPoint, PartyRange, PriceTier, Restaurant, RestaurantId};
pub use room::{
    Decision, MemberId, Room, RoomCode, RoomEffect, RoomEvent, RoomPhase, RoomRejection,
    RoomSummary, RoomView, Tally,
};
pub use scoring::{MatchScorer, ScoreBreakdown, ScoringContext, ScoringWeights, TagMapping};
