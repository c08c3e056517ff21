//! Question value objects

use super::answer::{
    BasicAnswer, Choice, DistancePreference, MealType, PortionChoice, PriceChoice, SpiceChoice,
};
use crate::core::error::DomainError;
use crate::restaurant::PartyRange;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Stable question identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Restaurant attribute a basic question maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicAttribute {
    Price,
    Spice,
    Portion,
    PartySize,
    MealType,
    Distance,
}

impl BasicAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasicAttribute::Price => "price",
            BasicAttribute::Spice => "spice",
            BasicAttribute::Portion => "portion",
            BasicAttribute::PartySize => "party_size",
            BasicAttribute::MealType => "meal_type",
            BasicAttribute::Distance => "distance",
        }
    }
}

/// Whether a question filters on an attribute or flavours by tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QuestionKind {
    Basic(BasicAttribute),
    Fun,
}

impl QuestionKind {
    pub fn is_basic(&self) -> bool {
        matches!(self, QuestionKind::Basic(_))
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fun" => QuestionKind::Fun,
            "price" => QuestionKind::Basic(BasicAttribute::Price),
            "spice" | "spicy" => QuestionKind::Basic(BasicAttribute::Spice),
            "portion" => QuestionKind::Basic(BasicAttribute::Portion),
            "party_size" | "people" => QuestionKind::Basic(BasicAttribute::PartySize),
            "meal_type" | "eat_or_drink" => QuestionKind::Basic(BasicAttribute::MealType),
            "distance" => QuestionKind::Basic(BasicAttribute::Distance),
            other => {
                return Err(format!(
                    "Unknown question kind: {}. Valid: fun, price, spice, portion, party_size, meal_type, distance",
                    other
                ));
            }
        };
        Ok(kind)
    }
}

impl TryFrom<String> for QuestionKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuestionKind> for String {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::Fun => "fun".to_string(),
            QuestionKind::Basic(attr) => attr.as_str().to_string(),
        }
    }
}

/// Makes a question visible only after another question got a given answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub question_id: QuestionId,
    pub required_answer: String,
}

/// A questionnaire question
///
/// Basic questions carry exactly two opposing options. Option order is
/// significant: the first option is the first pole of the attribute
/// (budget, spicy, light, eat, nearby) and the second the opposite pole.
/// Party-size options are parsed from the label itself (`"1~4"`, `"5+"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub depends_on: Option<Dependency>,
    /// Modes this question belongs to; empty means every mode
    #[serde(default)]
    pub modes: Vec<String>,
}

impl Question {
    pub fn basic(
        id: impl Into<String>,
        text: impl Into<String>,
        attribute: BasicAttribute,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self {
            id: QuestionId::new(id),
            text: text.into(),
            kind: QuestionKind::Basic(attribute),
            options: vec![first.into(), second.into()],
            depends_on: None,
            modes: Vec::new(),
        }
    }

    pub fn fun<I, S>(id: impl Into<String>, text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: QuestionId::new(id),
            text: text.into(),
            kind: QuestionKind::Fun,
            options: options.into_iter().map(Into::into).collect(),
            depends_on: None,
            modes: Vec::new(),
        }
    }

    pub fn depending_on(
        mut self,
        question_id: impl Into<String>,
        required_answer: impl Into<String>,
    ) -> Self {
        self.depends_on = Some(Dependency {
            question_id: QuestionId::new(question_id),
            required_answer: required_answer.into(),
        });
        self
    }

    pub fn in_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modes = modes.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the question belongs to `mode`
    pub fn in_mode(&self, mode: &str) -> bool {
        self.modes.is_empty() || self.modes.iter().any(|m| m.eq_ignore_ascii_case(mode))
    }

    /// Structural validation: basic questions need exactly two options
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.text.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(format!(
                "question {} has empty text",
                self.id
            )));
        }
        if self.kind.is_basic() && self.options.len() != 2 {
            return Err(DomainError::InvalidQuestion(format!(
                "basic question {} must have exactly two options, found {}",
                self.id,
                self.options.len()
            )));
        }
        Ok(())
    }

    fn option_index(&self, label: &str) -> Option<usize> {
        let label = label.trim();
        self.options
            .iter()
            .position(|o| o.trim().eq_ignore_ascii_case(label))
    }

    /// Classify a chosen label into a closed [`Choice`]
    ///
    /// This is the single point where option text is interpreted; scoring only
    /// ever switches on the returned variant.
    pub fn classify(&self, label: &str) -> Result<Choice, DomainError> {
        let unknown = || DomainError::UnknownOption {
            question: self.text.clone(),
            label: label.to_string(),
        };
        if label.trim().is_empty() {
            return Err(unknown());
        }

        let attribute = match self.kind {
            QuestionKind::Fun => return Ok(Choice::Fun),
            QuestionKind::Basic(attribute) => attribute,
        };

        if attribute == BasicAttribute::PartySize {
            return label
                .parse::<PartyRange>()
                .map(|range| Choice::Basic(BasicAnswer::PartySize(range)));
        }

        let first = match self.option_index(label).ok_or_else(unknown)? {
            0 => true,
            1 => false,
            _ => return Err(unknown()),
        };

        let answer = match attribute {
            BasicAttribute::Price => BasicAnswer::Price(if first {
                PriceChoice::Budget
            } else {
                PriceChoice::Splurge
            }),
            BasicAttribute::Spice => BasicAnswer::Spice(if first {
                SpiceChoice::Spicy
            } else {
                SpiceChoice::Mild
            }),
            BasicAttribute::Portion => BasicAnswer::Portion(if first {
                PortionChoice::Light
            } else {
                PortionChoice::Hearty
            }),
            BasicAttribute::MealType => BasicAnswer::MealType(if first {
                MealType::Eat
            } else {
                MealType::Drink
            }),
            BasicAttribute::Distance => BasicAnswer::Distance(if first {
                DistancePreference::Nearby
            } else {
                DistancePreference::Farther
            }),
            BasicAttribute::PartySize => BasicAnswer::PartySize(label.parse()?),
        };
        Ok(Choice::Basic(answer))
    }
}
