//! Ranking configuration from TOML (`[ranking]` section)
//!
//! ```toml
//! [ranking]
//! threshold = 0.5          # omit to use twice the score floor
//! fallback_size = 10
//! shortlist_size = 10
//! alternates_size = 5
//! shuffle = true
//! ```

use serde::{Deserialize, Serialize};
use tablepick_domain::ranking::{DEFAULT_ALTERNATES, DEFAULT_FALLBACK_SIZE, DEFAULT_PICKS};
use tablepick_domain::{ConfigIssue, ConfigIssueCode, RankOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRankingConfig {
    pub threshold: Option<f64>,
    /// Entries kept when nothing reaches the threshold
    pub fallback_size: usize,
    pub shortlist_size: usize,
    pub alternates_size: usize,
    /// Shuffle group shortlists with the room code
    pub shuffle: bool,
}

impl Default for FileRankingConfig {
    fn default() -> Self {
        Self {
            threshold: None,
            fallback_size: DEFAULT_FALLBACK_SIZE,
            shortlist_size: DEFAULT_PICKS,
            alternates_size: DEFAULT_ALTERNATES,
            shuffle: true,
        }
    }
}

impl FileRankingConfig {
    pub fn to_rank_options(&self) -> (RankOptions, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let threshold = match self.threshold {
            Some(t) if !t.is_finite() || t < 0.0 => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::OutOfRange {
                        field: "ranking.threshold".to_string(),
                        value: t.to_string(),
                    },
                    format!(
                        "ranking.threshold: {} is out of range, using the default threshold",
                        t
                    ),
                ));
                None
            }
            other => other,
        };

        let fallback_size = if self.fallback_size == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroSize {
                    field: "ranking.fallback_size".to_string(),
                },
                format!(
                    "ranking.fallback_size: must be positive, using {}",
                    DEFAULT_FALLBACK_SIZE
                ),
            ));
            DEFAULT_FALLBACK_SIZE
        } else {
            self.fallback_size
        };

        (
            RankOptions {
                threshold,
                fallback_size,
            },
            issues,
        )
    }

    /// Picks and alternates sizes; zero alternates is allowed
    pub fn shortlist_sizes(&self) -> ((usize, usize), Vec<ConfigIssue>) {
        if self.shortlist_size > 0 {
            return ((self.shortlist_size, self.alternates_size), vec![]);
        }
        let issue = ConfigIssue::error(
            ConfigIssueCode::ZeroSize {
                field: "ranking.shortlist_size".to_string(),
            },
            format!(
                "ranking.shortlist_size: an empty shortlist can never be voted on, using {}",
                DEFAULT_PICKS
            ),
        );
        ((DEFAULT_PICKS, self.alternates_size), vec![issue])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablepick_domain::Severity;

    #[test]
    fn test_deserialize_ranking() {
        let config: super::super::FileConfig = toml::from_str(
            r#"
[ranking]
threshold = 0.5
shortlist_size = 8
alternates_size = 0
shuffle = false
"#,
        )
        .unwrap();
        let ranking = &config.ranking;
        assert_eq!(ranking.threshold, Some(0.5));
        assert_eq!(ranking.fallback_size, DEFAULT_FALLBACK_SIZE);
        assert!(!ranking.shuffle);
        let (sizes, issues) = ranking.shortlist_sizes();
        assert_eq!(sizes, (8, 0));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_zero_shortlist_is_an_error() {
        let config = FileRankingConfig {
            shortlist_size: 0,
            ..Default::default()
        };
        let ((picks, _), issues) = config.shortlist_sizes();
        assert_eq!(picks, DEFAULT_PICKS);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_negative_threshold_dropped() {
        let config = FileRankingConfig {
            threshold: Some(-1.0),
            ..Default::default()
        };
        let (options, issues) = config.to_rank_options();
        assert_eq!(options.threshold, None);
        assert_eq!(issues.len(), 1);
    }
}
