//! Classified answers
//!
//! Clients submit `(question text, label)` pairs as [`RawAnswer`]. Ingestion
//! classifies each pair once into an [`Answer`] whose [`Choice`] is a closed
//! variant set, so the scorer never inspects option text.

use crate::restaurant::PartyRange;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceChoice {
    /// Tier 1 or 2
    Budget,
    /// Tier 2 or 3
    Splurge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiceChoice {
    Spicy,
    Mild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortionChoice {
    Light,
    Hearty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Eat,
    Drink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistancePreference {
    Nearby,
    Farther,
}

/// An answer to a basic question, one variant per restaurant attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "attribute", content = "value", rename_all = "snake_case")]
pub enum BasicAnswer {
    Price(PriceChoice),
    Spice(SpiceChoice),
    Portion(PortionChoice),
    PartySize(PartyRange),
    MealType(MealType),
    Distance(DistancePreference),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "answer", rename_all = "lowercase")]
pub enum Choice {
    Basic(BasicAnswer),
    /// Mapped to restaurant tags through the tag table
    Fun,
}

/// Identity of an answer for selection counting
///
/// Basic answers are keyed by question text and label, so the same label on
/// two different questions never collides. Fun answers are pooled across
/// questions and keyed by label alone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnswerKey {
    Basic { question: String, label: String },
    Fun { label: String },
}

/// A `(question text, label)` pair as submitted by a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    pub question: String,
    pub label: String,
}

impl RawAnswer {
    pub fn new(question: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            label: label.into(),
        }
    }
}

/// A classified answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub label: String,
    pub choice: Choice,
}

impl Answer {
    pub fn new(question: impl Into<String>, label: impl Into<String>, choice: Choice) -> Self {
        Self {
            question: question.into().trim().to_string(),
            label: label.into().trim().to_string(),
            choice,
        }
    }

    pub fn basic(question: impl Into<String>, label: impl Into<String>, answer: BasicAnswer) -> Self {
        Self::new(question, label, Choice::Basic(answer))
    }

    pub fn fun(question: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(question, label, Choice::Fun)
    }

    pub fn is_basic(&self) -> bool {
        matches!(self.choice, Choice::Basic(_))
    }

    pub fn key(&self) -> AnswerKey {
        match self.choice {
            Choice::Basic(_) => AnswerKey::Basic {
                question: self.question.clone(),
                label: self.label.clone(),
            },
            Choice::Fun => AnswerKey::Fun {
                label: self.label.clone(),
            },
        }
    }
}

/// One member's ordered answers
///
/// Answering a basic question twice replaces the earlier answer in place.
/// Fun questions may legitimately collect several labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Answer>", into = "Vec<Answer>")]
pub struct AnswerSet {
    answers: Vec<Answer>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, answer: Answer) {
        if answer.is_basic()
            && let Some(existing) = self
                .answers
                .iter_mut()
                .find(|a| a.is_basic() && a.question == answer.question)
        {
            *existing = answer;
            return;
        }
        if !self.answers.contains(&answer) {
            self.answers.push(answer);
        }
    }

    pub fn with(mut self, answer: Answer) -> Self {
        self.push(answer);
        self
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn basic(&self) -> impl Iterator<Item = (&Answer, &BasicAnswer)> {
        self.answers.iter().filter_map(|a| match &a.choice {
            Choice::Basic(b) => Some((a, b)),
            Choice::Fun => None,
        })
    }

    pub fn fun(&self) -> impl Iterator<Item = &Answer> {
        self.answers.iter().filter(|a| !a.is_basic())
    }

    /// The distance preference, if one was expressed
    pub fn distance_preference(&self) -> Option<DistancePreference> {
        self.basic().find_map(|(_, b)| match b {
            BasicAnswer::Distance(pref) => Some(*pref),
            _ => None,
        })
    }
}

impl From<Vec<Answer>> for AnswerSet {
    fn from(answers: Vec<Answer>) -> Self {
        answers.into_iter().collect()
    }
}

impl From<AnswerSet> for Vec<Answer> {
    fn from(set: AnswerSet) -> Self {
        set.answers
    }
}

impl FromIterator<Answer> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = Answer>>(iter: T) -> Self {
        let mut set = AnswerSet::new();
        for answer in iter {
            set.push(answer);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_answer_replaced_in_place() {
        let set = AnswerSet::new()
            .with(Answer::basic("Spicy?", "Yes", BasicAnswer::Spice(SpiceChoice::Spicy)))
            .with(Answer::fun("Mood?", "Cozy"))
            .with(Answer::basic("Spicy?", "No", BasicAnswer::Spice(SpiceChoice::Mild)));

        assert_eq!(set.len(), 2);
        assert_eq!(set.answers()[0].label, "No");
    }

    #[test]
    fn test_fun_answers_accumulate_without_duplicates() {
        let set: AnswerSet = [
            Answer::fun("Mood?", "Cozy"),
            Answer::fun("Mood?", "Lively"),
            Answer::fun("Mood?", "Cozy"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.fun().count(), 2);
    }

    #[test]
    fn test_answer_key_separates_questions() {
        let a = Answer::basic("Spicy?", "Yes", BasicAnswer::Spice(SpiceChoice::Spicy));
        let b = Answer::basic("Drinks?", "Yes", BasicAnswer::MealType(MealType::Drink));
        assert_ne!(a.key(), b.key());
        assert_eq!(
            Answer::fun("Q1", "Cozy").key(),
            Answer::fun("Q2", "Cozy").key()
        );
    }

    #[test]
    fn test_distance_preference() {
        let set = AnswerSet::new().with(Answer::basic(
            "How far?",
            "Close by",
            BasicAnswer::Distance(DistancePreference::Nearby),
        ));
        assert_eq!(set.distance_preference(), Some(DistancePreference::Nearby));
        assert_eq!(AnswerSet::new().distance_preference(), None);
    }

    #[test]
    fn test_answer_trims_text() {
        let a = Answer::fun("  Mood? ", " Cozy ");
        assert_eq!(a.question, "Mood?");
        assert_eq!(a.label, "Cozy");
    }

    #[test]
    fn test_deserialized_set_keeps_one_answer_per_basic_question() {
        let json = serde_json::to_value(vec![
            Answer::basic("Spicy?", "Yes", BasicAnswer::Spice(SpiceChoice::Spicy)),
            Answer::fun("Mood?", "Cozy"),
            Answer::basic("Spicy?", "No", BasicAnswer::Spice(SpiceChoice::Mild)),
            Answer::fun("Mood?", "Cozy"),
        ])
        .unwrap();

        let set: AnswerSet = serde_json::from_value(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.answers()[0].label, "No");
        assert_eq!(serde_json::to_value(&set).unwrap().as_array().map(Vec::len), Some(2));
    }
}
