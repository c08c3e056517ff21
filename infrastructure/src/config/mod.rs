//! Configuration file loading for tablepick
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./tablepick.toml` or `./.tablepick.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/tablepick/config.toml`
//! 4. Fallback: `~/.config/tablepick/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_DRINK_CATEGORIES, FileCatalogConfig, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileOutputFormat, FileRankingConfig, FileScoringConfig, FileVotingConfig,
};
pub use loader::ConfigLoader;
