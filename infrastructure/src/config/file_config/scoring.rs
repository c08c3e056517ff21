//! Scoring configuration from TOML (`[scoring]` section)
//!
//! Any weight left out keeps its built-in value:
//!
//! ```toml
//! [scoring]
//! strict = true
//!
//! [scoring.weights]
//! rating = 4.0
//! group_consensus = 2.0
//!
//! [scoring.distance]
//! nearby_km = 1.5
//! ```

use serde::{Deserialize, Serialize};
use tablepick_domain::scoring::DistanceProfile;
use tablepick_domain::{ConfigIssue, ConfigIssueCode, ScoringWeights};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScoringConfig {
    /// A failed basic answer excludes the restaurant
    pub strict: bool,
    pub weights: ScoringWeights,
    pub distance: DistanceProfile,
}

impl Default for FileScoringConfig {
    fn default() -> Self {
        Self {
            strict: true,
            weights: ScoringWeights::default(),
            distance: DistanceProfile::default(),
        }
    }
}

impl FileScoringConfig {
    /// Weights with out-of-range fields replaced by their defaults
    pub fn parse_weights(&self) -> (ScoringWeights, Vec<ConfigIssue>) {
        let defaults = ScoringWeights::default();
        let mut weights = self.weights;
        let mut issues = Vec::new();

        let fields: [(&str, &mut f64, f64); 9] = [
            ("basic_match", &mut weights.basic_match, defaults.basic_match),
            ("fun_match", &mut weights.fun_match, defaults.fun_match),
            ("rating", &mut weights.rating, defaults.rating),
            ("popularity", &mut weights.popularity, defaults.popularity),
            ("distance", &mut weights.distance, defaults.distance),
            (
                "group_consensus",
                &mut weights.group_consensus,
                defaults.group_consensus,
            ),
            ("min_score", &mut weights.min_score, defaults.min_score),
            (
                "review_normalizer",
                &mut weights.review_normalizer,
                defaults.review_normalizer,
            ),
            (
                "like_normalizer",
                &mut weights.like_normalizer,
                defaults.like_normalizer,
            ),
        ];

        for (name, value, default) in fields {
            // Normalizers divide and the floor must stay above zero
            let must_be_positive =
                matches!(name, "min_score" | "review_normalizer" | "like_normalizer");
            let invalid = !value.is_finite() || *value < 0.0 || (must_be_positive && *value == 0.0);
            if invalid {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::OutOfRange {
                        field: format!("scoring.weights.{}", name),
                        value: value.to_string(),
                    },
                    format!(
                        "scoring.weights.{}: {} is out of range, using {}",
                        name, value, default
                    ),
                ));
                *value = default;
            }
        }

        (weights, issues)
    }

    pub fn parse_distance(&self) -> (DistanceProfile, Vec<ConfigIssue>) {
        let d = self.distance;
        let ordered = d.nearby_km > 0.0 && d.nearby_km <= d.max_km && d.farther_width_km > 0.0;
        if ordered {
            return (d, vec![]);
        }
        let issue = ConfigIssue::warning(
            ConfigIssueCode::OutOfRange {
                field: "scoring.distance".to_string(),
                value: format!(
                    "nearby_km={} max_km={} farther_width_km={}",
                    d.nearby_km, d.max_km, d.farther_width_km
                ),
            },
            "scoring.distance: bands must satisfy 0 < nearby_km <= max_km with a positive width, using defaults",
        );
        (DistanceProfile::default(), vec![issue])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_weights_keep_defaults() {
        let config: super::super::FileConfig = toml::from_str(
            r#"
[scoring]
strict = false

[scoring.weights]
rating = 4.5
"#,
        )
        .unwrap();
        assert!(!config.scoring.strict);
        assert_eq!(config.scoring.weights.rating, 4.5);
        assert_eq!(
            config.scoring.weights.basic_match,
            ScoringWeights::default().basic_match
        );
        assert!(config.scoring.parse_weights().1.is_empty());
    }

    #[test]
    fn test_negative_weight_is_replaced() {
        let mut config = FileScoringConfig::default();
        config.weights.popularity = -1.0;
        config.weights.min_score = 0.0;

        let (weights, issues) = config.parse_weights();
        assert_eq!(issues.len(), 2);
        assert_eq!(weights.popularity, ScoringWeights::default().popularity);
        assert_eq!(weights.min_score, ScoringWeights::default().min_score);
    }

    #[test]
    fn test_inverted_distance_bands() {
        let mut config = FileScoringConfig::default();
        config.distance.nearby_km = 20.0;

        let (distance, issues) = config.parse_distance();
        assert_eq!(distance, DistanceProfile::default());
        assert_eq!(issues.len(), 1);
    }
}
