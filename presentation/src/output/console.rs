//! Console output formatter for tablepick results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use tablepick_application::{Recommendations, SimulationReport};
use tablepick_domain::core::string::truncate_label;
use tablepick_domain::questionnaire::Dependency;
use tablepick_domain::room::DecisionSource;
use tablepick_domain::{
    ConfigIssue, Decision, OutputFormat, QuestionKind, Questionnaire, RoomView, ScoredRestaurant,
    Severity, Shortlist,
};

const NAME_WIDTH: usize = 28;

/// Formats tablepick results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a ranked shortlist
    pub fn format_recommendations(result: &Recommendations, format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::format_json(result);
        }

        let mut output = String::new();
        output.push_str(&Self::header("Recommendations"));
        output.push('\n');

        if result.is_empty() {
            output.push_str(&format!(
                "\n{}\n",
                "The restaurant catalog is empty.".yellow()
            ));
            output.push_str(&Self::footer());
            return output;
        }

        if format == OutputFormat::Full {
            output.push_str(&Self::section_header("Merged Answers"));
            let members = result.merged.member_count().max(1);
            for answer in result.merged.answers.answers() {
                let count = result.merged.selection.get(&answer.key());
                output.push_str(&format!(
                    "  {} {}{}\n",
                    format!("{}:", answer.question).dimmed(),
                    answer.label,
                    if members > 1 {
                        format!(" ({}/{})", count, members).dimmed().to_string()
                    } else {
                        String::new()
                    }
                ));
            }
        }

        if result.fell_back {
            output.push_str(&format!(
                "\n{}\n",
                "Nothing matched every answer; showing the closest restaurants.".yellow()
            ));
        }

        output.push_str(&Self::format_shortlist(&result.shortlist, format));
        output.push_str(&format!(
            "\n{} {} restaurants considered\n",
            "Catalog:".dimmed(),
            result.catalog_size
        ));
        output.push_str(&Self::footer());
        output
    }

    /// Format the outcome of a replayed room
    pub fn format_report(report: &SimulationReport, format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::format_json(report);
        }

        let view = &report.view;
        let mut output = String::new();
        output.push_str(&Self::header(&format!("Room {}", view.code)));
        output.push('\n');
        output.push_str(&format!(
            "{} {}   {} {}   {} {}/{}\n",
            "Phase:".cyan().bold(),
            view.phase,
            "Members:".cyan().bold(),
            view.members.len(),
            "Voted:".cyan().bold(),
            view.voted,
            view.total
        ));

        if format == OutputFormat::Full {
            output.push_str(&Self::section_header("Steps"));
            for step in &report.steps {
                let status = match &step.error {
                    None => "ok".green().to_string(),
                    Some(error) => format!("{} {}", "rejected:".red(), error),
                };
                output.push_str(&format!(
                    "  [{:>7}ms] {:<26} {}\n",
                    step.at_ms, step.action, status
                ));
            }

            if let Some(shortlist) = &view.shortlist {
                output.push_str(&Self::format_shortlist(shortlist, format));
            }
        }

        output.push_str(&Self::format_tally(view));
        output.push_str(&Self::format_decision(view));

        if let Some(summary) = &view.summary {
            output.push_str(&format!(
                "\n{} decided in {:.1}s with {} vote(s)\n",
                "Summary:".dimmed(),
                summary.latency_ms as f64 / 1000.0,
                summary.vote_count
            ));
        }

        let rejected = report.rejected();
        if rejected > 0 && format != OutputFormat::Full {
            output.push_str(&format!(
                "{}\n",
                format!("{} step(s) rejected; use -o full for details", rejected).dimmed()
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format the question list
    pub fn format_questionnaire(questionnaire: &Questionnaire, format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::format_json(questionnaire.questions());
        }

        let mut output = String::new();
        output.push_str(&Self::header("Questionnaire"));
        output.push('\n');

        if questionnaire.is_empty() {
            output.push_str(&format!("\n{}\n", "No questions for this mode.".yellow()));
        }

        for (i, question) in questionnaire.questions().iter().enumerate() {
            let kind = match question.kind {
                QuestionKind::Fun => "fun".magenta().to_string(),
                QuestionKind::Basic(attribute) => attribute.as_str().blue().to_string(),
            };
            output.push_str(&format!(
                "\n{:>2}. {} {}\n",
                i + 1,
                question.text.bold(),
                format!("[{}]", kind).dimmed()
            ));
            output.push_str(&format!("    {}\n", question.options.join(" / ")));

            if let Some(Dependency {
                question_id,
                required_answer,
            }) = &question.depends_on
            {
                output.push_str(&format!(
                    "    {}\n",
                    format!("only if {} = {}", question_id, required_answer).dimmed()
                ));
            }
            if format == OutputFormat::Full && !question.modes.is_empty() {
                output.push_str(&format!(
                    "    {}\n",
                    format!("modes: {}", question.modes.join(", ")).dimmed()
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format configuration issues, one per line
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format as JSON
    pub fn format_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_shortlist(shortlist: &Shortlist, format: OutputFormat) -> String {
        let mut output = Self::section_header("Shortlist");
        for (i, entry) in shortlist.picks.iter().enumerate() {
            output.push_str(&Self::format_entry(i + 1, entry, format));
        }

        if !shortlist.alternates.is_empty() {
            if format == OutputFormat::Full {
                output.push_str(&format!("\n{}\n", "Alternates:".cyan().bold()));
                for (i, entry) in shortlist.alternates.iter().enumerate() {
                    output.push_str(&Self::format_entry(
                        shortlist.picks.len() + i + 1,
                        entry,
                        format,
                    ));
                }
            } else {
                let names: Vec<_> = shortlist
                    .alternates
                    .iter()
                    .map(|s| s.restaurant.name.as_str())
                    .collect();
                output.push_str(&format!(
                    "\n{} {}\n",
                    "Alternates:".dimmed(),
                    names.join(", ").dimmed()
                ));
            }
        }
        output
    }

    fn format_entry(rank: usize, entry: &ScoredRestaurant, format: OutputFormat) -> String {
        let r = &entry.restaurant;
        let price = r.price_tier.map(|p| p.to_string()).unwrap_or_default();
        let mut line = format!(
            "{:>3}. {:<width$} {:<3} {} {}\n",
            rank,
            truncate_label(&r.name, NAME_WIDTH),
            price.green(),
            format!("★{:.1}", r.rating).yellow(),
            format!("({:.1})", entry.score).dimmed(),
            width = NAME_WIDTH
        );

        if format == OutputFormat::Full {
            let b = &entry.breakdown;
            let detail = if b.excluded {
                "excluded by a basic answer".red().to_string()
            } else {
                format!(
                    "basic {:.1}  full {:.1}  fun {:.1}  rating {:.1}  popular {:.1}  distance {:.1}  group {:.1}",
                    b.basic, b.full_match, b.fun, b.rating, b.popularity, b.distance, b.consensus
                )
                .dimmed()
                .to_string()
            };
            line.push_str(&format!("       {}\n", detail));
            if !r.tags.is_empty() {
                line.push_str(&format!("       {}\n", r.tags.join(", ").dimmed()));
            }
        }
        line
    }

    fn format_tally(view: &RoomView) -> String {
        if view.tally.is_empty() {
            return String::new();
        }
        let mut output = Self::section_header("Votes");
        let max = view.tally.max();
        for entry in view.tally.iter().filter(|e| e.count > 0) {
            let name = Self::restaurant_name(view, entry.restaurant.as_str());
            let bar = "█".repeat(entry.count as usize);
            let bar = if entry.count == max {
                bar.green().to_string()
            } else {
                bar.blue().to_string()
            };
            output.push_str(&format!(
                "  {:<width$} {} {}\n",
                truncate_label(&name, NAME_WIDTH),
                bar,
                entry.count,
                width = NAME_WIDTH
            ));
        }
        output
    }

    fn format_decision(view: &RoomView) -> String {
        match &view.decision {
            None => String::new(),
            Some(Decision::NoResult) => format!(
                "\n{} {}\n",
                "No result:".yellow().bold(),
                "nobody voted or liked anything; retry voting to continue"
            ),
            Some(Decision::Winner {
                restaurant,
                support,
                tie_broken,
                source,
            }) => {
                let name = Self::restaurant_name(view, restaurant.as_str());
                let basis = match source {
                    DecisionSource::Votes => format!("{} vote(s)", support),
                    DecisionSource::Likes => format!("{} like(s)", support),
                    DecisionSource::Host => "chosen by host".to_string(),
                };
                let tie = if *tie_broken { ", tie broken" } else { "" };
                format!(
                    "\n{} {} {}\n",
                    "Winner:".green().bold(),
                    name.bold(),
                    format!("({}{})", basis, tie).dimmed()
                )
            }
        }
    }

    /// Display name from the shortlist, falling back to the id
    fn restaurant_name(view: &RoomView, id: &str) -> String {
        view.shortlist
            .as_ref()
            .and_then(|s| s.iter().find(|e| e.restaurant.id.as_str() == id))
            .map(|e| e.restaurant.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_recommendations(&self, result: &Recommendations, format: OutputFormat) -> String {
        Self::format_recommendations(result, format)
    }

    fn format_report(&self, report: &SimulationReport, format: OutputFormat) -> String {
        Self::format_report(report, format)
    }

    fn format_questionnaire(&self, questionnaire: &Questionnaire, format: OutputFormat) -> String {
        Self::format_questionnaire(questionnaire, format)
    }
}
