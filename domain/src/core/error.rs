//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Data-shape variance is normalized rather than reported; these errors are
/// reserved for inputs that cannot be interpreted at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid room code: {0}")]
    InvalidRoomCode(String),

    #[error("Invalid member id: {0}")]
    InvalidMemberId(String),

    #[error("Invalid price tier: {0}")]
    InvalidPriceTier(String),

    #[error("Invalid party size: {0}")]
    InvalidPartySize(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Unknown option '{label}' for question '{question}'")]
    UnknownOption { question: String, label: String },
}

impl DomainError {
    /// Whether the error came from a questionnaire lookup rather than a value parse
    pub fn is_questionnaire_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidQuestion(_) | DomainError::UnknownOption { .. }
        )
    }
}
