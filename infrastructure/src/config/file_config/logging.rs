//! Logging configuration from TOML (`[logging]` section)
//!
//! ```toml
//! [logging]
//! publications = "~/.local/share/tablepick/rooms.jsonl"
//! file = "tablepick.log"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL sink for room publications
    pub publications: Option<String>,
    /// Diagnostic log file, written alongside stderr
    pub file: Option<String>,
}

impl FileLoggingConfig {
    pub fn publications_path(&self) -> Option<PathBuf> {
        self.publications.as_deref().map(expand_home)
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.as_deref().map(expand_home)
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => Path::new(path).to_path_buf(),
    }
}
