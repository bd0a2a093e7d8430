//! Error types for quiz loading, access checks, and session events.
//!
//! Loader and CLI code carries these inside `anyhow::Error`, so callers can
//! `downcast_ref` to classify a failure without string matching.

use thiserror::Error;

/// Errors raised while loading a quiz, before any session exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// No quiz with this id exists in the store.
    #[error("quiz not found: {0}")]
    QuizNotFound(String),

    /// The quiz document is malformed and can never be taken.
    #[error("invalid quiz definition '{quiz_id}': {reason}")]
    InvalidQuizDefinition { quiz_id: String, reason: String },
}

impl QuizError {
    pub(crate) fn invalid(quiz_id: &str, reason: impl Into<String>) -> Self {
        QuizError::InvalidQuizDefinition {
            quiz_id: quiz_id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Reasons the access resolver refuses to let an actor start a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Nobody is signed in; the caller should send the user to log in.
    #[error("access denied: sign in required")]
    Unauthenticated,

    /// The actor has a personal allow-list and this quiz is not on it.
    #[error("access denied: quiz '{quiz_id}' is not in the allowed tests of {actor}")]
    NotInPersonalAllowList { actor: String, quiz_id: String },

    /// The quiz restricts its audience and the actor is not on the list.
    #[error("access denied: {actor} is not allowed to take quiz '{quiz_id}'")]
    NotInQuizAllowList { actor: String, quiz_id: String },
}

impl AccessError {
    /// Returns `true` if the caller should redirect to authentication.
    pub fn requires_login(&self) -> bool {
        matches!(self, AccessError::Unauthenticated)
    }
}

/// Rejections returned by session events.
///
/// Double submission and mutation after submission are not errors; those
/// calls return [`Outcome::Ignored`](crate::session::Outcome::Ignored).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Manual submission before every question has an answer.
    #[error("{answered} of {total} questions answered; answer all questions before submitting")]
    IncompleteAnswers { answered: usize, total: usize },

    /// The label is not one of the question's options.
    #[error("'{label}' is not an option of question {}", .index + 1)]
    InvalidAnswerLabel { index: usize, label: String },

    /// The question index is outside the quiz.
    #[error("question {} does not exist (quiz has {total})", .index + 1)]
    QuestionOutOfRange { index: usize, total: usize },

    /// The access grant was issued for a different quiz.
    #[error("access grant for quiz '{granted}' cannot start quiz '{requested}'")]
    GrantMismatch { granted: String, requested: String },

    /// The quiz failed validation at start.
    #[error(transparent)]
    InvalidQuiz(#[from] QuizError),
}

impl SessionError {
    /// Returns `true` if the user can fix this by continuing to answer.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            SessionError::InvalidQuiz(_) | SessionError::GrantMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_numbers_are_one_based_in_messages() {
        let err = SessionError::InvalidAnswerLabel {
            index: 1,
            label: "x".into(),
        };
        assert_eq!(err.to_string(), "'x' is not an option of question 2");
    }

    #[test]
    fn recoverability() {
        assert!(SessionError::IncompleteAnswers {
            answered: 1,
            total: 3
        }
        .is_recoverable());
        assert!(!SessionError::InvalidQuiz(QuizError::QuizNotFound("q".into())).is_recoverable());
        assert!(AccessError::Unauthenticated.requires_login());
    }
}
