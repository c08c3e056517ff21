//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod catalog;
mod logging;
mod output;
mod ranking;
mod scoring;
mod voting;

pub use catalog::{DEFAULT_DRINK_CATEGORIES, FileCatalogConfig};
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use ranking::FileRankingConfig;
pub use scoring::FileScoringConfig;
pub use voting::FileVotingConfig;

use serde::{Deserialize, Serialize};
use tablepick_application::{RecommendParams, RoomParams};
use tablepick_domain::ConfigIssue;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Scoring weights and distance bands
    pub scoring: FileScoringConfig,
    /// Threshold, fallback, and shortlist sizes
    pub ranking: FileRankingConfig,
    /// Group rule and room actor settings
    pub voting: FileVotingConfig,
    /// Data file locations
    pub catalog: FileCatalogConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Publication log and diagnostic file
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Every check mirrors a conversion below, so a config that validates
    /// clean converts without substitutions.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.scoring.parse_weights().1);
        issues.extend(self.scoring.parse_distance().1);
        issues.extend(self.ranking.to_rank_options().1);
        issues.extend(self.ranking.shortlist_sizes().1);
        issues.extend(self.voting.parse_rule().1);
        issues.extend(self.voting.parse_inbox_capacity().1);

        issues
    }

    /// Parameters for the Recommend use case
    pub fn to_recommend_params(&self) -> RecommendParams {
        let (weights, _) = self.scoring.parse_weights();
        let (distance, _) = self.scoring.parse_distance();
        let (rank, _) = self.ranking.to_rank_options();
        let ((picks, alternates), _) = self.ranking.shortlist_sizes();
        let (rule, _) = self.voting.parse_rule();

        RecommendParams {
            distance,
            rank,
            ..RecommendParams::default()
        }
        .with_weights(weights)
        .with_strict_basic_match(self.scoring.strict)
        .with_shortlist_sizes(picks, alternates)
        .with_shuffle(self.ranking.shuffle)
        .with_consensus_rule(rule)
    }

    /// Parameters for the room directory
    pub fn to_room_params(&self) -> RoomParams {
        let (capacity, _) = self.voting.parse_inbox_capacity();
        let params = RoomParams::default().with_inbox_capacity(capacity);
        match &self.catalog.question_mode {
            Some(mode) => params.with_question_mode(mode.clone()),
            None => params,
        }
    }
}
