//! Questions and answers
//!
//! Basic questions map to restaurant attributes; fun questions map to tags.
//! Answers are classified once against the [`Questionnaire`] and then merged
//! by question text, never by position, because conditional questions mean
//! members can see different subsets.

pub mod answer;
pub mod question;
#[allow(clippy::module_inception)]
pub mod questionnaire;

pub use answer::{
    Answer, AnswerKey, AnswerSet, BasicAnswer, Choice, DistancePreference, MealType,
    PortionChoice, PriceChoice, RawAnswer, SpiceChoice,
};
pub use question::{BasicAttribute, Dependency, Question, QuestionId, QuestionKind};
pub use questionnaire::Questionnaire;
