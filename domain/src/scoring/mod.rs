//! Restaurant scoring
//!
//! A pure function of one restaurant, one answer set, the weights, and a small
//! context. Strict basic matching is a hard filter expressed as a score: a
//! failed basic answer pins the result to [`weights::MIN_SCORE`].

pub mod scorer;
pub mod tag_mapping;
pub mod weights;

pub use scorer::{MatchScorer, ScoreBreakdown, ScoringContext};
pub use tag_mapping::{TagMapping, WeightedTag};
pub use weights::{DistanceProfile, ScoringWeights};
