//! Voting configuration from TOML (`[voting]` section)
//!
//! ```toml
//! [voting]
//! rule = "majority"      # or "unanimous", "atleast:2", "60%"
//! inbox_capacity = 64
//! ```

use serde::{Deserialize, Serialize};
use tablepick_domain::{ConfigIssue, ConfigIssueCode, ConsensusRule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVotingConfig {
    /// Rule deciding when a basic answer has group support:
    /// "majority", "unanimous", "atleast:N", "N%"
    pub rule: String,
    /// Capacity of each room's event inbox
    pub inbox_capacity: usize,
}

impl Default for FileVotingConfig {
    fn default() -> Self {
        Self {
            rule: "majority".to_string(),
            inbox_capacity: 64,
        }
    }
}

impl FileVotingConfig {
    /// Parse the rule string into a ConsensusRule
    pub fn parse_rule(&self) -> (ConsensusRule, Vec<ConfigIssue>) {
        match self.rule.parse::<ConsensusRule>() {
            Ok(rule) => (rule, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "voting.rule".to_string(),
                        value: self.rule.clone(),
                        valid_values: vec![
                            "majority".to_string(),
                            "unanimous".to_string(),
                            "atleast:N".to_string(),
                            "N%".to_string(),
                        ],
                    },
                    format!(
                        "voting.rule: unknown value '{}', falling back to 'majority'",
                        self.rule
                    ),
                );
                (ConsensusRule::default(), vec![issue])
            }
        }
    }

    pub fn parse_inbox_capacity(&self) -> (usize, Vec<ConfigIssue>) {
        if self.inbox_capacity > 0 {
            return (self.inbox_capacity, vec![]);
        }
        let default = Self::default().inbox_capacity;
        let issue = ConfigIssue::warning(
            ConfigIssueCode::ZeroSize {
                field: "voting.inbox_capacity".to_string(),
            },
            format!("voting.inbox_capacity: must be positive, using {}", default),
        );
        (default, vec![issue])
    }
}
