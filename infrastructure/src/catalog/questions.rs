//! JSON question catalog
//!
//! Accepts a list of questions or `{"questions": [...]}`. Each question is
//! checked on load; broken ones are skipped with a warning so one bad entry
//! does not take the questionnaire down.
//!
//! ```json
//! [
//!   {"id": "meal", "text": "Eat or drink?", "kind": "meal_type", "options": ["Eat", "Drink"]},
//!   {"id": "spice", "text": "Spicy?", "kind": "spice", "options": ["Yes", "No"],
//!    "depends_on": {"question_id": "meal", "required_answer": "Eat"}},
//!   {"id": "mood", "text": "Mood?", "kind": "fun", "options": ["Cozy", "Lively"],
//!    "modes": ["dinner"]}
//! ]
//! ```

use super::error::{CatalogLoadError, read_json};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tablepick_application::{CatalogError, QuestionCatalog};
use tablepick_domain::{Question, Questionnaire};
use tracing::{debug, warn};

pub struct JsonQuestionCatalog {
    path: PathBuf,
}

impl JsonQuestionCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All valid questions in file order
    pub async fn load(&self) -> Result<Vec<Question>, CatalogLoadError> {
        let items = match read_json(&self.path).await? {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("questions") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(CatalogLoadError::Layout {
                        path: self.path.clone(),
                        reason: "expected a \"questions\" list".to_string(),
                    });
                }
            },
            _ => {
                return Err(CatalogLoadError::Layout {
                    path: self.path.clone(),
                    reason: "expected a list of questions".to_string(),
                });
            }
        };

        let mut questions = Vec::with_capacity(items.len());
        let mut seen = HashSet::new();
        for (index, item) in items.into_iter().enumerate() {
            let question = match serde_json::from_value::<Question>(item) {
                Ok(q) => q,
                Err(e) => {
                    warn!("Skipping question #{} in {}: {}", index, self.path.display(), e);
                    continue;
                }
            };
            if let Err(e) = question.validate() {
                warn!("Skipping question '{}': {}", question.id, e);
                continue;
            }
            if !seen.insert(question.id.clone()) {
                warn!("Skipping duplicate question id '{}'", question.id);
                continue;
            }
            questions.push(question);
        }

        debug!("Loaded {} questions from {}", questions.len(), self.path.display());
        Ok(questions)
    }
}

#[async_trait]
impl QuestionCatalog for JsonQuestionCatalog {
    async fn questionnaire(&self, mode: Option<&str>) -> Result<Questionnaire, CatalogError> {
        let questions = self.load().await?;
        Ok(match mode {
            Some(mode) => Questionnaire::for_mode(questions, mode),
            None => Questionnaire::new(questions),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablepick_domain::QuestionKind;

    const QUESTIONS: &str = r#"{"questions": [
        {"id": "meal", "text": "Eat or drink?", "kind": "meal_type", "options": ["Eat", "Drink"]},
        {"id": "spice", "text": "Spicy?", "kind": "spice", "options": ["Yes", "No"],
         "depends_on": {"question_id": "meal", "required_answer": "Eat"}},
        {"id": "mood", "text": "Mood?", "kind": "fun", "options": ["Cozy", "Lively"],
         "modes": ["dinner"]},
        {"id": "broken", "text": "Only one option?", "kind": "price", "options": ["Cheap"]},
        {"id": "meal", "text": "Duplicate", "kind": "fun", "options": ["A"]},
        {"id": "odd", "text": "Odd kind", "kind": "weather"}
    ]}"#;

    fn catalog() -> (tempfile::TempDir, JsonQuestionCatalog) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        std::fs::write(&path, QUESTIONS).unwrap();
        (dir, JsonQuestionCatalog::new(path))
    }

    #[tokio::test]
    async fn test_invalid_questions_are_skipped() {
        let (_dir, catalog) = catalog();
        let questions = catalog.load().await.unwrap();

        let ids: Vec<_> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["meal", "spice", "mood"]);
        assert_eq!(questions[2].kind, QuestionKind::Fun);
        assert!(questions[1].depends_on.is_some());
    }

    #[tokio::test]
    async fn test_mode_filter() {
        let (_dir, catalog) = catalog();

        let all = catalog.questionnaire(None).await.unwrap();
        assert_eq!(all.questions().len(), 3);

        let lunch = catalog.questionnaire(Some("lunch")).await.unwrap();
        assert_eq!(lunch.questions().len(), 2);

        let dinner = catalog.questionnaire(Some("Dinner")).await.unwrap();
        assert_eq!(dinner.questions().len(), 3);
    }

    #[tokio::test]
    async fn test_wrong_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        std::fs::write(&path, r#"{"items": []}"#).unwrap();

        let result = JsonQuestionCatalog::new(path).questionnaire(None).await;
        assert!(matches!(result, Err(CatalogError::Malformed(_))));
    }
}
