//! Ranking, shortlisting, and the room-seeded shuffle

pub mod ranker;
pub mod shortlist;
pub mod shuffle;

pub use ranker::{DEFAULT_FALLBACK_SIZE, RankOptions, Ranking, RecommendationRanker, ScoredRestaurant};
pub use shortlist::{DEFAULT_ALTERNATES, DEFAULT_PICKS, Shortlist};
pub use shuffle::{Lcg, seed_from_str, seeded_shuffle};
