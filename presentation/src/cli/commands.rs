//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for recommendations and room results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every shortlisted restaurant with its score breakdown
    Full,
    /// Only the shortlist or the final decision
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for tablepick_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => tablepick_domain::OutputFormat::Full,
            OutputFormat::Summary => tablepick_domain::OutputFormat::Summary,
            OutputFormat::Json => tablepick_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for tablepick
#[derive(Parser, Debug)]
#[command(name = "tablepick")]
#[command(author, version, about = "Pick a restaurant together - score, shortlist, vote")]
#[command(long_about = r#"
tablepick ranks a restaurant catalog against questionnaire answers and helps a
group settle on one place.

A group's answers are merged question by question, the catalog is ranked
against the merged answers, and members vote on a shortlist. Ties are broken
with a shuffle seeded by the room code, so every member sees the same winner.

Configuration files are loaded from (in priority order):
1. --config <path>        Explicit config file
2. ./tablepick.toml       Project-level config
3. ~/.config/tablepick/config.toml   Global config

Example:
  tablepick recommend --answers me.json
  tablepick recommend --answers group.json --room ABCDEF -o full
  tablepick simulate room-script.json
  tablepick questions --mode dinner
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output] format in config)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank the catalog for one member or a whole group
    Recommend {
        /// JSON answers: a list of {question, label}, or {"members": [...]}
        #[arg(short, long, value_name = "FILE")]
        answers: PathBuf,

        /// Room code; seeds the group shortlist shuffle
        #[arg(long, value_name = "CODE")]
        room: Option<String>,

        /// Question mode used to classify the answers
        #[arg(long)]
        mode: Option<String>,

        /// Latitude of the party, for distance answers
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of the party, for distance answers
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },

    /// Replay a timed room script through a live room
    Simulate {
        /// JSON room script
        #[arg(value_name = "FILE")]
        script: PathBuf,
    },

    /// Print the questionnaire
    Questions {
        /// Only questions tagged with this mode
        #[arg(long)]
        mode: Option<String>,
    },
}
