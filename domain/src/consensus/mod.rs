//! Group answer consensus
//!
//! Turns several members' answer sets into one representative set plus the
//! per-answer selection counts that drive the scorer's group bonus.
//!
//! ```text
//!  member A ─┐
//!  member B ─┼─► per-question tally ─► winner (+ majority boost) ─┐
//!  member C ─┘                                                    ├─► MergedAnswers
//!            └─► pooled fun-label frequency ─► top 3 ─────────────┘
//! ```

pub mod aggregator;
pub mod rule;
pub mod selection;

pub use aggregator::{ConsensusAggregator, MergedAnswers, TOP_FUN_ANSWERS};
pub use rule::ConsensusRule;
pub use selection::SelectionCounts;
