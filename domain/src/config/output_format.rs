//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for recommendations and room results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every ranked restaurant with its score, plus alternates and tallies
    Full,
    /// Only the shortlist or the final decision (default)
    #[default]
    Summary,
    /// JSON output
    Json,
}
