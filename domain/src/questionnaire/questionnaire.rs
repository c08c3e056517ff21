//! Mode-filtered, ordered question list

use super::answer::{Answer, AnswerSet, RawAnswer};
use super::question::{Question, QuestionId};
use crate::core::error::DomainError;

/// The ordered questions shown in one mode (Aggregate)
///
/// Resolves conditional visibility and turns raw submissions into classified
/// [`AnswerSet`]s.
///
/// # Example
///
/// ```
/// use tablepick_domain::questionnaire::{BasicAttribute, Question, Questionnaire, RawAnswer};
///
/// let questionnaire = Questionnaire::new(vec![
///     Question::basic("meal", "Eat or drink?", BasicAttribute::MealType, "Eat", "Drink"),
///     Question::basic("spice", "Spicy?", BasicAttribute::Spice, "Yes", "No")
///         .depending_on("meal", "Eat"),
/// ]);
///
/// let answered = vec![RawAnswer::new("Eat or drink?", "Drink")];
/// assert_eq!(questionnaire.visible(&answered).len(), 1);
/// assert!(questionnaire.next_unanswered(&answered).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Questionnaire {
    questions: Vec<Question>,
}

impl Questionnaire {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Keep only the questions that belong to `mode`, preserving order
    pub fn for_mode(questions: Vec<Question>, mode: &str) -> Self {
        Self::new(questions.into_iter().filter(|q| q.in_mode(mode)).collect())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn by_id(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    pub fn by_text(&self, text: &str) -> Option<&Question> {
        let text = text.trim();
        self.questions.iter().find(|q| q.text.trim() == text)
    }

    fn answer_for<'a>(&self, id: &QuestionId, answered: &'a [RawAnswer]) -> Option<&'a str> {
        let question = self.by_id(id)?;
        answered
            .iter()
            .rev()
            .find(|a| a.question.trim() == question.text.trim())
            .map(|a| a.label.as_str())
    }

    /// Whether `question` is shown given the answers so far
    ///
    /// A dependency on a question that is itself hidden also hides this one.
    pub fn is_visible(&self, question: &Question, answered: &[RawAnswer]) -> bool {
        self.is_visible_depth(question, answered, self.questions.len())
    }

    fn is_visible_depth(&self, question: &Question, answered: &[RawAnswer], depth: usize) -> bool {
        let Some(dep) = &question.depends_on else {
            return true;
        };
        if depth == 0 {
            return false;
        }
        let Some(parent) = self.by_id(&dep.question_id) else {
            return false;
        };
        self.is_visible_depth(parent, answered, depth - 1)
            && self
                .answer_for(&dep.question_id, answered)
                .is_some_and(|label| label.trim().eq_ignore_ascii_case(dep.required_answer.trim()))
    }

    pub fn visible(&self, answered: &[RawAnswer]) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| self.is_visible(q, answered))
            .collect()
    }

    /// First visible question without an answer
    pub fn next_unanswered(&self, answered: &[RawAnswer]) -> Option<&Question> {
        self.visible(answered).into_iter().find(|q| {
            !answered
                .iter()
                .any(|a| a.question.trim() == q.text.trim())
        })
    }

    pub fn classify(&self, raw: &RawAnswer) -> Result<Answer, DomainError> {
        let question = self
            .by_text(&raw.question)
            .ok_or_else(|| DomainError::InvalidQuestion(raw.question.clone()))?;
        let choice = question.classify(&raw.label)?;
        Ok(Answer::new(&question.text, &raw.label, choice))
    }

    /// Classify a member's submission
    ///
    /// Pairs that do not resolve against this questionnaire are returned as
    /// errors alongside the set and left out of it.
    pub fn ingest(&self, raw: &[RawAnswer]) -> (AnswerSet, Vec<DomainError>) {
        let mut set = AnswerSet::new();
        let mut rejected = Vec::new();
        for pair in raw {
            match self.classify(pair) {
                Ok(answer) => set.push(answer),
                Err(e) => rejected.push(e),
            }
        }
        (set, rejected)
    }
}
