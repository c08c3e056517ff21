//! Ingest Answers use case
//!
//! Classifies raw `{question, label}` pairs against the questionnaire once, so
//! everything downstream works on closed answer variants.

use crate::ports::question_catalog::QuestionCatalog;
use crate::ports::restaurant_catalog::CatalogError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tablepick_domain::{AnswerSet, DomainError, MemberId, Questionnaire, RawAnswer};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Question catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid member: {0}")]
    InvalidMember(#[from] DomainError),
}

/// Answers as submitted by members before classification
///
/// A bare list is a single member's submission; the object form names each
/// member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswersDocument {
    Solo(Vec<RawAnswer>),
    Group { members: Vec<MemberSubmission> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSubmission {
    pub member: String,
    pub answers: Vec<RawAnswer>,
}

impl AnswersDocument {
    /// `(member name, answers)` pairs; a solo submission is named "me"
    pub fn submissions(&self) -> Vec<(&str, &[RawAnswer])> {
        match self {
            AnswersDocument::Solo(answers) => vec![("me", answers.as_slice())],
            AnswersDocument::Group { members } => members
                .iter()
                .map(|m| (m.member.as_str(), m.answers.as_slice()))
                .collect(),
        }
    }
}

/// One member's classified answers plus what was dropped
#[derive(Debug, Clone)]
pub struct IngestedAnswers {
    pub member: MemberId,
    pub answers: AnswerSet,
    pub dropped: Vec<DomainError>,
}

/// Use case for classifying submitted answers
pub struct IngestAnswersUseCase<Q: QuestionCatalog + 'static> {
    questions: Arc<Q>,
}

impl<Q: QuestionCatalog + 'static> IngestAnswersUseCase<Q> {
    pub fn new(questions: Arc<Q>) -> Self {
        Self { questions }
    }

    pub async fn questionnaire(&self, mode: Option<&str>) -> Result<Questionnaire, IngestError> {
        Ok(self.questions.questionnaire(mode).await?)
    }

    /// Classify every submission in the document, in document order
    pub async fn execute(
        &self,
        document: &AnswersDocument,
        mode: Option<&str>,
    ) -> Result<Vec<IngestedAnswers>, IngestError> {
        let questionnaire = self.questionnaire(mode).await?;
        document
            .submissions()
            .into_iter()
            .map(|(member, raw)| classify_member(&questionnaire, member, raw))
            .collect()
    }
}

/// Classify one member's raw answers; unresolvable pairs are dropped with a warning
pub fn classify_member(
    questionnaire: &Questionnaire,
    member: &str,
    raw: &[RawAnswer],
) -> Result<IngestedAnswers, IngestError> {
    let member = MemberId::new(member)?;
    let (answers, dropped) = questionnaire.ingest(raw);
    for error in &dropped {
        warn!("Dropping answer from {}: {}", member, error);
    }
    debug!(
        "Classified {} of {} answers from {}",
        answers.len(),
        raw.len(),
        member
    );
    Ok(IngestedAnswers {
        member,
        answers,
        dropped,
    })
}
