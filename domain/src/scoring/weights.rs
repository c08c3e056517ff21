//! Scoring weights and the distance profile

use serde::{Deserialize, Serialize};

/// Credit for each matched basic answer
pub const BASIC_MATCH: f64 = 10.0;
/// Credit for a fully matched fun answer (fractional matches scale down)
pub const FUN_MATCH: f64 = 5.0;
pub const RATING_WEIGHT: f64 = 3.0;
pub const POPULARITY_WEIGHT: f64 = 2.0;
pub const DISTANCE_WEIGHT: f64 = 4.0;
pub const GROUP_CONSENSUS_WEIGHT: f64 = 3.0;
/// Score floor; excluded restaurants score exactly this
pub const MIN_SCORE: f64 = 0.1;
/// Review count at which the review boost saturates
pub const REVIEW_NORMALIZER: f64 = 500.0;
/// Like count at which the like boost saturates
pub const LIKE_NORMALIZER: f64 = 100.0;

/// Numeric weights used by [`MatchScorer`](super::MatchScorer)
///
/// Defaults are the module constants. Configuration may override any field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub basic_match: f64,
    pub fun_match: f64,
    pub rating: f64,
    pub popularity: f64,
    pub distance: f64,
    pub group_consensus: f64,
    pub min_score: f64,
    pub review_normalizer: f64,
    pub like_normalizer: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            basic_match: BASIC_MATCH,
            fun_match: FUN_MATCH,
            rating: RATING_WEIGHT,
            popularity: POPULARITY_WEIGHT,
            distance: DISTANCE_WEIGHT,
            group_consensus: GROUP_CONSENSUS_WEIGHT,
            min_score: MIN_SCORE,
            review_normalizer: REVIEW_NORMALIZER,
            like_normalizer: LIKE_NORMALIZER,
        }
    }
}

impl ScoringWeights {
    /// Bonus granted once when every basic answer matched
    pub fn full_match_bonus(&self) -> f64 {
        0.5 * self.basic_match
    }

    /// Default ranker threshold, twice the floor
    pub fn default_threshold(&self) -> f64 {
        2.0 * self.min_score
    }
}

/// Distance bands in kilometres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceProfile {
    /// "Nearby" answers match within this radius
    pub nearby_km: f64,
    /// "Farther" answers match within this radius; the nearby boost reaches 0 here
    pub max_km: f64,
    /// Peak of the "farther" bell
    pub farther_center_km: f64,
    pub farther_width_km: f64,
}

impl Default for DistanceProfile {
    fn default() -> Self {
        Self {
            nearby_km: 2.0,
            max_km: 10.0,
            farther_center_km: 5.0,
            farther_width_km: 2.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let w = ScoringWeights::default();
        assert_eq!(w.basic_match, BASIC_MATCH);
        assert_eq!(w.full_match_bonus(), 5.0);
        assert_eq!(w.default_threshold(), 2.0 * MIN_SCORE);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let w: ScoringWeights = serde_json::from_str(r#"{"rating": 6.0}"#).unwrap();
        assert_eq!(w.rating, 6.0);
        assert_eq!(w.fun_match, FUN_MATCH);
    }
}
