//! Catalog ranking with threshold and fallback

use crate::questionnaire::AnswerSet;
use crate::restaurant::Restaurant;
use crate::scoring::{MatchScorer, ScoreBreakdown, ScoringContext};
use serde::{Deserialize, Serialize};

/// Size of the fallback list used when the threshold filters out everything
pub const DEFAULT_FALLBACK_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankOptions {
    /// Minimum score kept; `None` means twice the scorer's floor
    pub threshold: Option<f64>,
    pub fallback_size: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            threshold: None,
            fallback_size: DEFAULT_FALLBACK_SIZE,
        }
    }
}

/// A restaurant together with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRestaurant {
    pub restaurant: Restaurant,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Ranker output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub ranked: Vec<ScoredRestaurant>,
    /// The threshold removed every entry and the raw top list was used instead
    pub fell_back: bool,
}

impl Ranking {
    /// Only an empty catalog produces an empty ranking
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }
}

/// Scores a whole catalog and orders it
///
/// Sorting is stable, so restaurants with equal scores keep catalog order.
pub struct RecommendationRanker<'a> {
    scorer: MatchScorer<'a>,
    options: RankOptions,
}

impl<'a> RecommendationRanker<'a> {
    pub fn new(scorer: MatchScorer<'a>, options: RankOptions) -> Self {
        Self { scorer, options }
    }

    pub fn threshold(&self) -> f64 {
        self.options
            .threshold
            .unwrap_or_else(|| self.scorer.weights().default_threshold())
    }

    pub fn rank(
        &self,
        catalog: &[Restaurant],
        answers: &AnswerSet,
        ctx: &ScoringContext<'_>,
    ) -> Ranking {
        let mut scored: Vec<ScoredRestaurant> = catalog
            .iter()
            .map(|restaurant| {
                let breakdown = self.scorer.breakdown(restaurant, answers, ctx);
                ScoredRestaurant {
                    restaurant: restaurant.clone(),
                    score: breakdown.total,
                    breakdown,
                }
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let threshold = self.threshold();
        let kept: Vec<ScoredRestaurant> = scored
            .iter()
            .filter(|s| s.score >= threshold)
            .cloned()
            .collect();

        if kept.is_empty() && !scored.is_empty() {
            scored.truncate(self.options.fallback_size.max(1));
            return Ranking {
                ranked: scored,
                fell_back: true,
            };
        }

        Ranking {
            ranked: kept,
            fell_back: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::{Answer, BasicAnswer, SpiceChoice};
    use crate::restaurant::Spiciness;
    use crate::scoring::{ScoringWeights, TagMapping};

    fn rank(catalog: &[Restaurant], answers: &AnswerSet) -> Ranking {
        let weights = ScoringWeights::default();
        let tags = TagMapping::new();
        let ranker = RecommendationRanker::new(MatchScorer::new(&weights, &tags), RankOptions::default());
        ranker.rank(catalog, answers, &ScoringContext::default())
    }

    fn spicy_answers() -> AnswerSet {
        AnswerSet::new().with(Answer::basic(
            "Spicy?",
            "Yes",
            BasicAnswer::Spice(SpiceChoice::Spicy),
        ))
    }

    #[test]
    fn test_sorted_descending_and_stable() {
        let catalog = vec![
            Restaurant::new("a", "A").with_spiciness(Spiciness::Yes),
            Restaurant::new("b", "B").with_spiciness(Spiciness::Yes).with_rating(4.0, 0),
            Restaurant::new("c", "C").with_spiciness(Spiciness::Both),
            Restaurant::new("d", "D").with_spiciness(Spiciness::No),
        ];
        let ranking = rank(&catalog, &spicy_answers());

        let ids: Vec<_> = ranking.ranked.iter().map(|s| s.restaurant.id.as_str()).collect();
        // b has a rating boost; a and c tie and keep catalog order; d is filtered
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert!(!ranking.fell_back);
    }

    #[test]
    fn test_fallback_when_everything_filtered() {
        let catalog: Vec<Restaurant> = (0..50)
            .map(|i| {
                Restaurant::new(format!("r{}", i), format!("R{}", i))
                    .with_spiciness(Spiciness::No)
                    .with_rating(f64::from(i % 5), i)
            })
            .collect();
        let ranking = rank(&catalog, &spicy_answers());

        assert!(ranking.fell_back);
        assert_eq!(ranking.len(), DEFAULT_FALLBACK_SIZE);
        // Every score is the floor, so catalog order is preserved
        assert_eq!(ranking.ranked[0].restaurant.id.as_str(), "r0");
        assert_eq!(ranking.ranked[9].restaurant.id.as_str(), "r9");
    }

    #[test]
    fn test_non_empty_for_any_non_empty_catalog() {
        let catalog = vec![Restaurant::new("only", "Only")];
        assert_eq!(rank(&catalog, &spicy_answers()).len(), 1);
        assert_eq!(rank(&catalog, &AnswerSet::new()).len(), 1);
    }

    #[test]
    fn test_empty_catalog() {
        let ranking = rank(&[], &spicy_answers());
        assert!(ranking.is_empty());
        assert!(!ranking.fell_back);
    }

    #[test]
    fn test_explicit_threshold() {
        let weights = ScoringWeights::default();
        let tags = TagMapping::new();
        let ranker = RecommendationRanker::new(
            MatchScorer::new(&weights, &tags),
            RankOptions {
                threshold: Some(2.0),
                fallback_size: 3,
            },
        );
        let catalog = vec![
            Restaurant::new("low", "Low").with_rating(2.5, 0),
            Restaurant::new("high", "High").with_rating(5.0, 0),
        ];
        let ranking = ranker.rank(&catalog, &AnswerSet::new(), &ScoringContext::default());
        let ids: Vec<_> = ranking.ranked.iter().map(|s| s.restaurant.id.as_str()).collect();
        assert_eq!(ids, vec!["high"]);
    }
}
