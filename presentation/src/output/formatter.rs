//! Output formatter trait

use tablepick_application::{Recommendations, SimulationReport};
use tablepick_domain::{OutputFormat, Questionnaire};

/// Trait for formatting tablepick results
pub trait OutputFormatter {
    /// Format a ranked shortlist
    fn format_recommendations(&self, result: &Recommendations, format: OutputFormat) -> String;

    /// Format the outcome of a replayed room
    fn format_report(&self, report: &SimulationReport, format: OutputFormat) -> String;

    /// Format the question list
    fn format_questionnaire(&self, questionnaire: &Questionnaire, format: OutputFormat) -> String;
}
