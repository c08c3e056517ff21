//! Restaurant ↔ answer-set affinity

use super::tag_mapping::TagMapping;
use super::weights::{DistanceProfile, ScoringWeights};
use crate::consensus::SelectionCounts;
use crate::questionnaire::{
    AnswerSet, BasicAnswer, DistancePreference, MealType, PortionChoice, PriceChoice, SpiceChoice,
};
use crate::restaurant::{GeoPoint, Portion, Restaurant, Spiciness, VenueKind};
use serde::{Deserialize, Serialize};

/// Per-call inputs that are not part of the answers themselves
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub user_location: Option<GeoPoint>,
    /// Group selection counts; enables the consensus bonus
    pub group: Option<&'a SelectionCounts>,
    /// Any failed basic answer pins the score to the floor
    pub strict_basic_match: bool,
    pub distance: DistanceProfile,
}

impl Default for ScoringContext<'_> {
    fn default() -> Self {
        Self {
            user_location: None,
            group: None,
            strict_basic_match: true,
            distance: DistanceProfile::default(),
        }
    }
}

impl<'a> ScoringContext<'a> {
    pub fn with_group(mut self, group: &'a SelectionCounts) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_user_location(mut self, location: GeoPoint) -> Self {
        self.user_location = Some(location);
        self
    }

    pub fn lenient(mut self) -> Self {
        self.strict_basic_match = false;
        self
    }
}

/// Where a score came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub basic: f64,
    pub fun: f64,
    pub rating: f64,
    pub popularity: f64,
    pub distance: f64,
    pub consensus: f64,
    pub full_match: f64,
    /// A basic answer failed under strict matching
    pub excluded: bool,
    pub total: f64,
}

/// Computes a restaurant's affinity with an answer set
///
/// # Example
///
/// ```
/// use tablepick_domain::questionnaire::{Answer, AnswerSet, BasicAnswer, SpiceChoice};
/// use tablepick_domain::restaurant::{Restaurant, Spiciness};
/// use tablepick_domain::scoring::{MatchScorer, ScoringContext, ScoringWeights, TagMapping};
///
/// let weights = ScoringWeights::default();
/// let tags = TagMapping::new();
/// let scorer = MatchScorer::new(&weights, &tags);
///
/// let answers = AnswerSet::new()
///     .with(Answer::basic("Spicy?", "Yes", BasicAnswer::Spice(SpiceChoice::Spicy)));
/// let hot = Restaurant::new("hot", "Hot Pot").with_spiciness(Spiciness::Yes);
/// let mild = Restaurant::new("mild", "Porridge").with_spiciness(Spiciness::No);
///
/// let ctx = ScoringContext::default();
/// assert!(scorer.score(&hot, &answers, &ctx) > scorer.score(&mild, &answers, &ctx));
/// assert_eq!(scorer.score(&mild, &answers, &ctx), weights.min_score);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MatchScorer<'a> {
    weights: &'a ScoringWeights,
    tags: &'a TagMapping,
}

impl<'a> MatchScorer<'a> {
    pub fn new(weights: &'a ScoringWeights, tags: &'a TagMapping) -> Self {
        Self { weights, tags }
    }

    pub fn weights(&self) -> &ScoringWeights {
        self.weights
    }

    pub fn score(&self, restaurant: &Restaurant, answers: &AnswerSet, ctx: &ScoringContext<'_>) -> f64 {
        self.breakdown(restaurant, answers, ctx).total
    }

    pub fn breakdown(
        &self,
        restaurant: &Restaurant,
        answers: &AnswerSet,
        ctx: &ScoringContext<'_>,
    ) -> ScoreBreakdown {
        let w = self.weights;
        let floor = w.min_score.max(0.0);
        let mut out = ScoreBreakdown::default();
        let distance_km = match (ctx.user_location, restaurant.valid_location()) {
            (Some(user), Some(place)) if user.is_valid() => Some(user.distance_km(place)),
            _ => None,
        };

        let mut basic_total = 0usize;
        let mut basic_matched = 0usize;
        for (answer, basic) in answers.basic() {
            basic_total += 1;
            if basic_matches(basic, restaurant, distance_km, &ctx.distance) {
                basic_matched += 1;
                out.basic += w.basic_match;
                if let Some(group) = ctx.group {
                    out.consensus += consensus_bonus(group, &answer.key(), w.group_consensus);
                }
            } else if ctx.strict_basic_match {
                out.excluded = true;
                out.total = floor;
                return out;
            }
        }

        for answer in answers.fun() {
            let fraction = self.tags.match_fraction(&answer.label, restaurant).clamp(0.0, 1.0);
            if fraction > 0.0 {
                out.fun += fraction * w.fun_match;
                if let Some(group) = ctx.group {
                    out.consensus += consensus_bonus(group, &answer.key(), w.group_consensus);
                }
            }
        }

        let rating = if restaurant.rating.is_finite() {
            restaurant.rating.max(0.0)
        } else {
            0.0
        };
        out.rating = (rating / 5.0).min(1.0) * w.rating;
        out.popularity = saturating_ratio(restaurant.review_count, w.review_normalizer) * w.popularity
            + saturating_ratio(restaurant.like_count, w.like_normalizer) * w.popularity;

        if let (Some(d), Some(pref)) = (distance_km, answers.distance_preference()) {
            out.distance = distance_boost(pref, d, &ctx.distance) * w.distance;
        }

        if basic_total > 0 && basic_matched == basic_total {
            out.full_match = w.full_match_bonus();
        }

        let total = out.basic
            + out.fun
            + out.rating
            + out.popularity
            + out.distance
            + out.consensus
            + out.full_match;
        out.total = if total.is_finite() { total.max(floor) } else { floor };
        out
    }
}

fn saturating_ratio(count: u32, normalizer: f64) -> f64 {
    if normalizer <= 0.0 {
        return 0.0;
    }
    (f64::from(count) / normalizer).min(1.0)
}

/// `(count / members)² × weight × members`
fn consensus_bonus(group: &SelectionCounts, key: &crate::questionnaire::AnswerKey, weight: f64) -> f64 {
    let members = group.member_count();
    if members == 0 {
        return 0.0;
    }
    let p = group.proportion(key);
    p * p * weight * members as f64
}

fn distance_boost(pref: DistancePreference, d: f64, profile: &DistanceProfile) -> f64 {
    match pref {
        DistancePreference::Nearby => {
            if profile.max_km <= 0.0 {
                return 0.0;
            }
            1.0 - (d / profile.max_km).min(1.0)
        }
        DistancePreference::Farther => {
            if profile.farther_width_km <= 0.0 {
                return 0.0;
            }
            let z = (d - profile.farther_center_km) / profile.farther_width_km;
            (-z * z).exp()
        }
    }
}

fn basic_matches(
    answer: &BasicAnswer,
    restaurant: &Restaurant,
    distance_km: Option<f64>,
    profile: &DistanceProfile,
) -> bool {
    match answer {
        BasicAnswer::Price(choice) => restaurant.price_tier.is_some_and(|tier| match choice {
            PriceChoice::Budget => tier.value() <= 2,
            PriceChoice::Splurge => tier.value() >= 2,
        }),
        BasicAnswer::Spice(choice) => restaurant.spiciness.is_some_and(|s| match choice {
            SpiceChoice::Spicy => matches!(s, Spiciness::Yes | Spiciness::Both),
            SpiceChoice::Mild => matches!(s, Spiciness::No | Spiciness::Both),
        }),
        BasicAnswer::Portion(choice) => restaurant.portion.is_some_and(|p| match choice {
            PortionChoice::Light => matches!(p, Portion::Light | Portion::Both),
            PortionChoice::Hearty => matches!(p, Portion::Hearty | Portion::Both),
        }),
        BasicAnswer::PartySize(range) => restaurant
            .party_size
            .is_some_and(|suggested| suggested.overlaps(range)),
        BasicAnswer::MealType(meal) => restaurant.venue.is_some_and(|v| match meal {
            MealType::Eat => matches!(v, VenueKind::Eat | VenueKind::Both),
            MealType::Drink => matches!(v, VenueKind::Drink | VenueKind::Both),
        }),
        // Without both locations the preference cannot be checked and does not filter
        BasicAnswer::Distance(pref) => distance_km.is_none_or(|d| match pref {
            DistancePreference::Nearby => d <= profile.nearby_km,
            DistancePreference::Farther => d <= profile.max_km,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::ConsensusAggregator;
    use crate::questionnaire::Answer;
    use crate::restaurant::{PartyRange, PriceTier};
    use crate::scoring::WeightedTag;

    const EPS: f64 = 1e-9;

    fn spicy() -> Answer {
        Answer::basic("Spicy?", "Yes", BasicAnswer::Spice(SpiceChoice::Spicy))
    }

    fn budget() -> Answer {
        Answer::basic("Budget?", "Cheap", BasicAnswer::Price(PriceChoice::Budget))
    }

    fn plain(id: &str) -> Restaurant {
        Restaurant::new(id, id)
    }

    fn score_with(r: &Restaurant, answers: &AnswerSet, ctx: &ScoringContext<'_>) -> ScoreBreakdown {
        let weights = ScoringWeights::default();
        let tags = TagMapping::new();
        MatchScorer::new(&weights, &tags).breakdown(r, answers, ctx)
    }

    #[test]
    fn test_basic_match_and_full_match_bonus() {
        let answers = AnswerSet::new().with(spicy()).with(budget());
        let r = plain("r")
            .with_spiciness(Spiciness::Both)
            .with_price_tier(PriceTier::new(2).unwrap());

        let b = score_with(&r, &answers, &ScoringContext::default());
        assert!(!b.excluded);
        assert!((b.basic - 20.0).abs() < EPS);
        assert!((b.full_match - 5.0).abs() < EPS);
        assert!((b.total - 25.0).abs() < EPS);
    }

    #[test]
    fn test_strict_failure_pins_to_floor() {
        let answers = AnswerSet::new().with(spicy()).with(budget());
        let r = plain("r")
            .with_spiciness(Spiciness::No)
            .with_price_tier(PriceTier::new(1).unwrap())
            .with_rating(5.0, 10_000);

        let b = score_with(&r, &answers, &ScoringContext::default());
        assert!(b.excluded);
        assert_eq!(b.total, ScoringWeights::default().min_score);
    }

    #[test]
    fn test_lenient_mode_keeps_partial_credit() {
        let answers = AnswerSet::new().with(spicy()).with(budget());
        let r = plain("r")
            .with_spiciness(Spiciness::No)
            .with_price_tier(PriceTier::new(1).unwrap());

        let b = score_with(&r, &answers, &ScoringContext::default().lenient());
        assert!(!b.excluded);
        assert!((b.basic - 10.0).abs() < EPS);
        assert_eq!(b.full_match, 0.0);
    }

    #[test]
    fn test_missing_attribute_fails_predicate() {
        let answers = AnswerSet::new().with(budget());
        let b = score_with(&plain("r"), &answers, &ScoringContext::default());
        assert!(b.excluded);
    }

    #[test]
    fn test_zero_basic_answers_pass_strict_without_full_bonus() {
        let r = plain("r").with_rating(5.0, 0);
        let b = score_with(&r, &AnswerSet::new(), &ScoringContext::default());
        assert!(!b.excluded);
        assert_eq!(b.full_match, 0.0);
        assert!((b.total - 3.0).abs() < EPS);
    }

    #[test]
    fn test_boosts_are_capped() {
        let r = plain("r").with_rating(9.0, 2_000).with_likes(1_000);
        let b = score_with(&r, &AnswerSet::new(), &ScoringContext::default());
        assert!((b.rating - 3.0).abs() < EPS);
        assert!((b.popularity - 4.0).abs() < EPS);
    }

    #[test]
    fn test_popularity_partial() {
        let r = plain("r").with_rating(0.0, 250).with_likes(50);
        let b = score_with(&r, &AnswerSet::new(), &ScoringContext::default());
        assert!((b.popularity - 2.0).abs() < EPS);
    }

    #[test]
    fn test_never_below_floor() {
        let r = plain("r").with_rating(-3.0, 0);
        let b = score_with(&r, &AnswerSet::new(), &ScoringContext::default());
        assert_eq!(b.total, ScoringWeights::default().min_score);

        let r = plain("r").with_rating(f64::NAN, 0);
        let b = score_with(&r, &AnswerSet::new(), &ScoringContext::default());
        assert_eq!(b.total, ScoringWeights::default().min_score);
    }

    #[test]
    fn test_fun_fraction_scaled() {
        let weights = ScoringWeights::default();
        let tags = TagMapping::new().with(
            "Adventurous",
            [WeightedTag::new("exotic", 1.0), WeightedTag::new("fusion", 1.0)],
        );
        let scorer = MatchScorer::new(&weights, &tags);
        let answers = AnswerSet::new().with(Answer::fun("Mood?", "Adventurous"));
        let r = plain("r").with_tags(["fusion"]);

        let b = scorer.breakdown(&r, &answers, &ScoringContext::default());
        assert!((b.fun - 2.5).abs() < EPS);
    }

    #[test]
    fn test_party_size_overlap() {
        let answers = AnswerSet::new().with(Answer::basic(
            "How many?",
            "5+",
            BasicAnswer::PartySize(PartyRange::new(5, None)),
        ));
        let small = plain("small").with_party_size(PartyRange::new(1, Some(4)));
        let big = plain("big").with_party_size(PartyRange::new(2, Some(8)));

        assert!(score_with(&small, &answers, &ScoringContext::default()).excluded);
        assert!(!score_with(&big, &answers, &ScoringContext::default()).excluded);
    }

    #[test]
    fn test_meal_type_uses_venue() {
        let answers = AnswerSet::new().with(Answer::basic(
            "Eat or drink?",
            "Drink",
            BasicAnswer::MealType(MealType::Drink),
        ));
        let bar = plain("bar").with_venue(VenueKind::Drink);
        let pub_ = plain("pub").with_venue(VenueKind::Both);
        let diner = plain("diner").with_venue(VenueKind::Eat);

        assert!(!score_with(&bar, &answers, &ScoringContext::default()).excluded);
        assert!(!score_with(&pub_, &answers, &ScoringContext::default()).excluded);
        assert!(score_with(&diner, &answers, &ScoringContext::default()).excluded);
    }

    #[test]
    fn test_distance_filter_and_boost() {
        let user = GeoPoint::new(37.5665, 126.9780);
        // ~1.1 km north
        let close = plain("close").with_location(GeoPoint::new(37.5765, 126.9780));
        // ~5.6 km north
        let mid = plain("mid").with_location(GeoPoint::new(37.6165, 126.9780));
        let nearby = AnswerSet::new().with(Answer::basic(
            "How far?",
            "Close",
            BasicAnswer::Distance(DistancePreference::Nearby),
        ));
        let farther = AnswerSet::new().with(Answer::basic(
            "How far?",
            "Far",
            BasicAnswer::Distance(DistancePreference::Farther),
        ));
        let ctx = ScoringContext::default().with_user_location(user);

        assert!(!score_with(&close, &nearby, &ctx).excluded);
        assert!(score_with(&mid, &nearby, &ctx).excluded);

        let close_far = score_with(&close, &farther, &ctx);
        let mid_far = score_with(&mid, &farther, &ctx);
        assert!(mid_far.distance > close_far.distance);

        let close_near = score_with(&close, &nearby, &ctx);
        assert!(close_near.distance > 3.0);
    }

    #[test]
    fn test_distance_unknown_location_passes() {
        let nearby = AnswerSet::new().with(Answer::basic(
            "How far?",
            "Close",
            BasicAnswer::Distance(DistancePreference::Nearby),
        ));
        let b = score_with(&plain("r"), &nearby, &ScoringContext::default());
        assert!(!b.excluded);
        assert_eq!(b.distance, 0.0);
    }

    #[test]
    fn test_group_consensus_bonus_is_squared() {
        let mild = Answer::basic("Spicy?", "No", BasicAnswer::Spice(SpiceChoice::Mild));
        let sets = vec![
            AnswerSet::new().with(spicy()),
            AnswerSet::new().with(mild),
            AnswerSet::new().with(spicy()),
            AnswerSet::new().with(spicy()),
        ];
        let merged = ConsensusAggregator::default().merge(&sets);
        let r = plain("r").with_spiciness(Spiciness::Yes);
        let ctx = ScoringContext::default().with_group(&merged.selection);

        let b = score_with(&r, &merged.answers, &ctx);
        // count = 3 + floor(3/4 * 3) = 5; (5/4)^2 * 3 * 4
        let expected = (5.0f64 / 4.0).powi(2) * 3.0 * 4.0;
        assert!((b.consensus - expected).abs() < EPS);

        let no_group = score_with(&r, &merged.answers, &ScoringContext::default());
        assert_eq!(no_group.consensus, 0.0);
    }
}
