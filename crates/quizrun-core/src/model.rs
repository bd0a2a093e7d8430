//! Core data model types for quizrun.
//!
//! A [`Quiz`] arrives fully materialized from a store and is never mutated
//! by a session. Options are keyed by label; positional order is only used
//! for display.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// A timed test: an ordered list of questions plus its audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique identifier for this quiz.
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Description shown above the questions.
    #[serde(default)]
    pub description: String,
    /// Countdown length, fixed when a session starts.
    pub time_limit_secs: u64,
    /// Questions in the only order they are shown and scored.
    pub questions: Vec<Question>,
    /// Actor identities allowed to take this quiz. Empty means open to all.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Prompt text; may be empty when the image is the whole prompt.
    #[serde(default)]
    pub prompt: String,
    /// Optional prompt image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Answer options, in display order.
    pub options: Vec<AnswerOption>,
    /// Label of the one correct option.
    pub correct_label: String,
}

/// One selectable answer, identified by its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Stable answer key, unique within its question.
    pub label: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl AnswerOption {
    /// A text-only option whose label is its own text.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            label: text.clone(),
            text: Some(text),
            image: None,
        }
    }

    /// Text shown to the user, falling back to the label.
    pub fn display_text(&self) -> &str {
        self.text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.label)
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl Question {
    /// Returns `true` if `label` names one of this question's options.
    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|o| o.label == label)
    }

    /// Find an option by label.
    pub fn option(&self, label: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.label == label)
    }

    fn validate(&self, quiz_id: &str, number: usize) -> Result<(), QuizError> {
        if self.prompt.trim().is_empty() && !is_present(self.image.as_deref()) {
            return Err(QuizError::invalid(
                quiz_id,
                format!("question {number} has neither text nor image"),
            ));
        }

        let mut labels = HashSet::new();
        for option in &self.options {
            if option.label.trim().is_empty() {
                return Err(QuizError::invalid(
                    quiz_id,
                    format!("question {number} has an option with an empty label"),
                ));
            }
            if !labels.insert(option.label.as_str()) {
                return Err(QuizError::invalid(
                    quiz_id,
                    format!("question {number} repeats option label '{}'", option.label),
                ));
            }
            if !is_present(option.text.as_deref()) && !is_present(option.image.as_deref()) {
                return Err(QuizError::invalid(
                    quiz_id,
                    format!(
                        "option '{}' of question {number} has neither text nor image",
                        option.label
                    ),
                ));
            }
        }

        if !labels.contains(self.correct_label.as_str()) {
            return Err(QuizError::invalid(
                quiz_id,
                format!(
                    "correct answer '{}' of question {number} matches no option",
                    self.correct_label
                ),
            ));
        }

        Ok(())
    }
}

impl Quiz {
    /// Number of questions; never zero for a validated quiz.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Check the invariants a session relies on.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidQuizDefinition` describing the first
    /// violation found.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.id.trim().is_empty() {
            return Err(QuizError::invalid(&self.id, "quiz id is empty"));
        }
        if self.questions.is_empty() {
            return Err(QuizError::invalid(&self.id, "quiz has no questions"));
        }
        for (i, question) in self.questions.iter().enumerate() {
            question.validate(&self.id, i + 1)?;
        }
        Ok(())
    }

    /// Title for display, falling back to the id.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

/// Role of a signed-in actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A signed-in user as resolved by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Identity, matched against quiz allow-lists.
    pub email: String,
    pub role: Role,
    /// Quiz ids this actor may take. When non-empty it replaces the quiz's
    /// own allow-list.
    #[serde(default)]
    pub allowed_tests: Vec<String>,
}

impl Actor {
    pub fn student(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: Role::Student,
            allowed_tests: Vec::new(),
        }
    }

    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: Role::Admin,
            allowed_tests: Vec::new(),
        }
    }

    pub fn with_allowed_tests<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tests = ids.into_iter().map(Into::into).collect();
        self
    }
}
