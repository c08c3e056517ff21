//! Recommendation parameters: scoring, ranking, and merging.
//!
//! [`RecommendParams`] groups everything [`RecommendUseCase`](crate::use_cases::recommend::RecommendUseCase)
//! needs beyond the catalog itself. The infrastructure config loader builds
//! it from the `[scoring]`, `[ranking]` and `[voting]` sections.

use serde::{Deserialize, Serialize};
use tablepick_domain::ranking::{DEFAULT_ALTERNATES, DEFAULT_PICKS};
use tablepick_domain::scoring::DistanceProfile;
use tablepick_domain::{ConsensusAggregator, ConsensusRule, RankOptions, ScoringWeights};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendParams {
    pub weights: ScoringWeights,
    /// A failed basic answer excludes the restaurant
    pub strict_basic_match: bool,
    pub distance: DistanceProfile,
    pub rank: RankOptions,
    pub shortlist_size: usize,
    pub alternates_size: usize,
    /// Shuffle the shortlist with the room seed (group mode only)
    pub shuffle_shortlist: bool,
    pub consensus_rule: ConsensusRule,
}

impl Default for RecommendParams {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            strict_basic_match: true,
            distance: DistanceProfile::default(),
            rank: RankOptions::default(),
            shortlist_size: DEFAULT_PICKS,
            alternates_size: DEFAULT_ALTERNATES,
            shuffle_shortlist: true,
            consensus_rule: ConsensusRule::default(),
        }
    }
}

impl RecommendParams {
    // ==================== Builder Methods ====================

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_strict_basic_match(mut self, strict: bool) -> Self {
        self.strict_basic_match = strict;
        self
    }

    pub fn with_shortlist_sizes(mut self, picks: usize, alternates: usize) -> Self {
        self.shortlist_size = picks;
        self.alternates_size = alternates;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle_shortlist = shuffle;
        self
    }

    pub fn with_consensus_rule(mut self, rule: ConsensusRule) -> Self {
        self.consensus_rule = rule;
        self
    }

    /// Aggregator configured with this rule and the consensus weight
    pub fn aggregator(&self) -> ConsensusAggregator {
        ConsensusAggregator::new(self.consensus_rule, self.weights.group_consensus)
    }
}
