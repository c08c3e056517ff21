//! Catalog configuration from TOML (`[catalog]` section)
//!
//! ```toml
//! [catalog]
//! restaurants = "data/restaurants.json"
//! questions = "data/questions.json"
//! tag_mappings = "data/tag_mappings.json"
//! question_mode = "dinner"
//! drink_categories = ["bar", "pub", "izakaya"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Category names that mark a venue as a place to drink
pub const DEFAULT_DRINK_CATEGORIES: &[&str] = &[
    "bar",
    "pub",
    "brewery",
    "cocktail bar",
    "wine bar",
    "izakaya",
    "pocha",
    "beer",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    pub restaurants: PathBuf,
    pub questions: PathBuf,
    /// Fun-answer label to tag table; without it every label matches its own name
    pub tag_mappings: Option<PathBuf>,
    /// Only questions tagged with this mode are asked
    pub question_mode: Option<String>,
    pub drink_categories: Vec<String>,
}

impl Default for FileCatalogConfig {
    fn default() -> Self {
        Self {
            restaurants: PathBuf::from("restaurants.json"),
            questions: PathBuf::from("questions.json"),
            tag_mappings: None,
            question_mode: None,
            drink_categories: DEFAULT_DRINK_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}
