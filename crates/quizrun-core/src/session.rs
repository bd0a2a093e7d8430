//! Session state machine: `NotStarted -> InProgress -> Submitted`.
//!
//! The state is a tagged union. The answer ledger and the countdown live
//! inside `InProgress`, and the only way out of `InProgress` moves them
//! into a [`Submission`]. That gives three guarantees by construction:
//! exactly one terminal transition, no tick after submission, and a ledger
//! that is frozen once scored.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::AccessGrant;
use crate::error::SessionError;
use crate::ledger::AnswerLedger;
use crate::model::Quiz;
use crate::scoring::{self, ScoreReport};
use crate::timer::{Countdown, Tick};

/// Why a session became submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionCause {
    Manual,
    Timeout,
}

impl fmt::Display for SubmissionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionCause::Manual => write!(f, "manual"),
            SubmissionCause::Timeout => write!(f, "timeout"),
        }
    }
}

/// Coarse session state, as seen by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Submitted,
}

/// Whether an event changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    /// The session was not in a state that takes this event. Not an error.
    Ignored,
}

/// Result of delivering one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is not running; nothing happened.
    Ignored,
    Running { remaining_secs: u64 },
    /// Time ran out and the session was submitted with cause `Timeout`.
    Expired,
}

/// The frozen end state of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    cause: SubmissionCause,
    ledger: AnswerLedger,
    result: ScoreReport,
    remaining_secs: u64,
    elapsed_secs: u64,
    submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn cause(&self) -> SubmissionCause {
        self.cause
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    pub fn result(&self) -> &ScoreReport {
        &self.result
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

#[derive(Debug)]
enum Phase {
    NotStarted,
    InProgress {
        ledger: AnswerLedger,
        countdown: Countdown,
    },
    Submitted(Submission),
}

/// Point-in-time view published to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub remaining_secs: u64,
    pub answered: usize,
    pub question_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<SubmissionCause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoreReport>,
}

impl SessionSnapshot {
    pub fn is_submitted(&self) -> bool {
        self.status == SessionStatus::Submitted
    }
}

/// One attempt at a quiz.
#[derive(Debug)]
pub struct Session {
    quiz: Arc<Quiz>,
    actor: Option<String>,
    started_at: Option<DateTime<Utc>>,
    phase: Phase,
}

impl Session {
    pub fn new(quiz: Arc<Quiz>) -> Self {
        Self {
            quiz,
            actor: None,
            started_at: None,
            phase: Phase::NotStarted,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Identity of the actor the session was started for.
    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn status(&self) -> SessionStatus {
        match self.phase {
            Phase::NotStarted => SessionStatus::NotStarted,
            Phase::InProgress { .. } => SessionStatus::InProgress,
            Phase::Submitted(_) => SessionStatus::Submitted,
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, Phase::Submitted(_))
    }

    /// Seconds left on the clock. Before start this is the full limit;
    /// after submission it is the time that was left when it happened.
    pub fn remaining_secs(&self) -> u64 {
        match &self.phase {
            Phase::NotStarted => self.quiz.time_limit_secs,
            Phase::InProgress { countdown, .. } => countdown.remaining_secs(),
            Phase::Submitted(s) => s.remaining_secs,
        }
    }

    /// Current answers; `None` before the session starts.
    pub fn ledger(&self) -> Option<&AnswerLedger> {
        match &self.phase {
            Phase::NotStarted => None,
            Phase::InProgress { ledger, .. } => Some(ledger),
            Phase::Submitted(s) => Some(&s.ledger),
        }
    }

    pub fn submission(&self) -> Option<&Submission> {
        match &self.phase {
            Phase::Submitted(s) => Some(s),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let submission = self.submission();
        SessionSnapshot {
            status: self.status(),
            remaining_secs: self.remaining_secs(),
            answered: self.ledger().map_or(0, AnswerLedger::len),
            question_count: self.quiz.question_count(),
            cause: submission.map(Submission::cause),
            result: submission.map(|s| s.result.clone()),
        }
    }

    /// `NotStarted -> InProgress`.
    ///
    /// Requires a grant for this quiz. The quiz is validated before the
    /// clock starts. A zero time limit submits immediately with cause
    /// `Timeout` and no ticks. Calling `start` again is ignored.
    ///
    /// # Errors
    ///
    /// `GrantMismatch` if the grant names another quiz, `InvalidQuiz` if the
    /// quiz fails validation. The session stays `NotStarted` in both cases.
    pub fn start(&mut self, grant: &AccessGrant) -> Result<Outcome, SessionError> {
        if !matches!(self.phase, Phase::NotStarted) {
            return Ok(Outcome::Ignored);
        }
        if grant.quiz_id() != self.quiz.id {
            return Err(SessionError::GrantMismatch {
                granted: grant.quiz_id().to_string(),
                requested: self.quiz.id.clone(),
            });
        }
        self.quiz.validate()?;

        self.actor = Some(grant.actor().to_string());
        self.started_at = Some(Utc::now());

        let countdown = Countdown::new(self.quiz.time_limit_secs);
        if countdown.is_expired() {
            tracing::info!(quiz = %self.quiz.id, "zero time limit, submitting immediately");
            self.phase = Phase::Submitted(close(
                &self.quiz,
                AnswerLedger::new(),
                countdown,
                SubmissionCause::Timeout,
            ));
        } else {
            tracing::info!(
                quiz = %self.quiz.id,
                actor = grant.actor(),
                time_limit_secs = self.quiz.time_limit_secs,
                "session started"
            );
            self.phase = Phase::InProgress {
                ledger: AnswerLedger::new(),
                countdown,
            };
        }
        Ok(Outcome::Accepted)
    }

    /// Record or overwrite the answer to question `index`.
    ///
    /// Ignored unless the session is in progress.
    ///
    /// # Errors
    ///
    /// `QuestionOutOfRange` or `InvalidAnswerLabel`; the ledger is unchanged.
    pub fn record_answer(&mut self, index: usize, label: &str) -> Result<Outcome, SessionError> {
        let Phase::InProgress { ledger, .. } = &mut self.phase else {
            tracing::debug!(index, "answer ignored: session not in progress");
            return Ok(Outcome::Ignored);
        };

        let total = self.quiz.question_count();
        let question = self
            .quiz
            .questions
            .get(index)
            .ok_or(SessionError::QuestionOutOfRange { index, total })?;

        if !question.has_option(label) {
            tracing::debug!(index, label, "answer rejected: unknown label");
            return Err(SessionError::InvalidAnswerLabel {
                index,
                label: label.to_string(),
            });
        }

        ledger.record(index, label);
        Ok(Outcome::Accepted)
    }

    /// `InProgress -> Submitted`, the only path to `Submitted`.
    ///
    /// The first call wins; later calls are ignored. A `Manual` submission
    /// needs every question answered, a `Timeout` is always accepted.
    ///
    /// # Errors
    ///
    /// `IncompleteAnswers` for a manual submission with gaps; the session
    /// stays in progress.
    pub fn submit(&mut self, cause: SubmissionCause) -> Result<Outcome, SessionError> {
        match std::mem::replace(&mut self.phase, Phase::NotStarted) {
            Phase::InProgress { ledger, countdown } => {
                let total = self.quiz.question_count();
                if cause == SubmissionCause::Manual && !ledger.covers(total) {
                    let answered = ledger.len();
                    self.phase = Phase::InProgress { ledger, countdown };
                    return Err(SessionError::IncompleteAnswers { answered, total });
                }
                self.phase = Phase::Submitted(close(&self.quiz, ledger, countdown, cause));
                Ok(Outcome::Accepted)
            }
            other => {
                self.phase = other;
                tracing::debug!(%cause, "submit ignored: session not in progress");
                Ok(Outcome::Ignored)
            }
        }
    }

    /// Advance the clock by one second, submitting on expiry.
    pub fn tick(&mut self) -> TickOutcome {
        match std::mem::replace(&mut self.phase, Phase::NotStarted) {
            Phase::InProgress { ledger, countdown } => match countdown.tick() {
                Tick::Running(countdown) => {
                    let remaining_secs = countdown.remaining_secs();
                    self.phase = Phase::InProgress { ledger, countdown };
                    TickOutcome::Running { remaining_secs }
                }
                Tick::Expired { elapsed_secs } => {
                    self.phase = Phase::Submitted(finish(
                        &self.quiz,
                        ledger,
                        0,
                        elapsed_secs,
                        SubmissionCause::Timeout,
                    ));
                    TickOutcome::Expired
                }
            },
            other => {
                self.phase = other;
                TickOutcome::Ignored
            }
        }
    }
}

/// Stop the countdown, then score.
fn close(quiz: &Quiz, ledger: AnswerLedger, countdown: Countdown, cause: SubmissionCause) -> Submission {
    let remaining_secs = countdown.remaining_secs();
    let elapsed_secs = countdown.elapsed_secs();
    drop(countdown);
    finish(quiz, ledger, remaining_secs, elapsed_secs, cause)
}

fn finish(
    quiz: &Quiz,
    ledger: AnswerLedger,
    remaining_secs: u64,
    elapsed_secs: u64,
    cause: SubmissionCause,
) -> Submission {
    let result = scoring::score(quiz, &ledger);
    tracing::info!(
        quiz = %quiz.id,
        %cause,
        correct = result.correct,
        total = result.total,
        percentage = result.percentage,
        "session submitted"
    );
    Submission {
        cause,
        ledger,
        result,
        remaining_secs,
        elapsed_secs,
        submitted_at: Utc::now(),
    }
}
