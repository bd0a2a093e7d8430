//! Scoring engine: per-question correctness and the aggregate percentage.
//!
//! Scoring is a pure function of the quiz and the ledger. The session calls
//! it exactly once, on submission; calling it again on the same ledger
//! yields the same report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ledger::AnswerLedger;
use crate::model::Quiz;

/// Percentage at or above which a result counts as passed.
pub const PASS_THRESHOLD: u8 = 70;
/// Percentage at or above which a result counts as fair.
pub const FAIR_THRESHOLD: u8 = 50;

/// Outcome of scoring a submitted ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Correctness per question, aligned with `Quiz::questions`.
    pub per_question_correct: Vec<bool>,
    /// Number of correct answers.
    pub correct: usize,
    /// Number of questions.
    pub total: usize,
    /// `round(100 * correct / total)`, halves rounded up.
    pub percentage: u8,
}

impl ScoreReport {
    /// Grade band for this result.
    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.percentage)
    }

    /// Number of questions answered incorrectly or left blank.
    pub fn incorrect(&self) -> usize {
        self.total - self.correct
    }
}

/// Score a ledger against a quiz.
///
/// A question is correct iff its ledger entry equals the correct label;
/// unanswered questions are incorrect. The quiz must have at least one
/// question, which [`Quiz::validate`] guarantees.
pub fn score(quiz: &Quiz, ledger: &AnswerLedger) -> ScoreReport {
    let per_question_correct: Vec<bool> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| ledger.get(i) == Some(q.correct_label.as_str()))
        .collect();
    let correct = per_question_correct.iter().filter(|c| **c).count();
    let total = per_question_correct.len();

    ScoreReport {
        per_question_correct,
        correct,
        total,
        percentage: round_percentage(correct, total),
    }
}

/// `round(100 * correct / total)` with round-half-up, in integer arithmetic.
pub fn round_percentage(correct: usize, total: usize) -> u8 {
    debug_assert!(total > 0, "quiz must have at least one question");
    debug_assert!(correct <= total);
    if total == 0 {
        return 0;
    }
    let (correct, total) = (correct as u64, total as u64);
    let pct = (200 * correct + total) / (2 * total);
    pct.min(100) as u8
}

/// Coarse result band shown next to the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Passed,
    Fair,
    Failed,
}

impl Grade {
    pub fn from_percentage(percentage: u8) -> Self {
        if percentage >= PASS_THRESHOLD {
            Grade::Passed
        } else if percentage >= FAIR_THRESHOLD {
            Grade::Fair
        } else {
            Grade::Failed
        }
    }

    /// Headline message for the result screen.
    pub fn message(&self) -> &'static str {
        match self {
            Grade::Passed => "Excellent! You passed the test.",
            Grade::Fair => "Good, but there is room to improve.",
            Grade::Failed => "Try again.",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Passed => write!(f, "passed"),
            Grade::Fair => write!(f, "fair"),
            Grade::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::quiz_with_answers;

    fn ledger(entries: &[(usize, &str)]) -> AnswerLedger {
        entries.iter().map(|(i, l)| (*i, l.to_string())).collect()
    }

    #[test]
    fn all_correct_is_100() {
        let quiz = quiz_with_answers("q", 60, &["a", "b", "c"]);
        let report = score(&quiz, &ledger(&[(0, "a"), (1, "b"), (2, "c")]));
        assert_eq!(report.percentage, 100);
        assert_eq!(report.per_question_correct, vec![true, true, true]);
        assert_eq!(report.grade(), Grade::Passed);
    }

    #[test]
    fn all_wrong_is_0() {
        let quiz = quiz_with_answers("q", 60, &["a", "b", "c"]);
        let report = score(&quiz, &ledger(&[(0, "b"), (1, "c"), (2, "a")]));
        assert_eq!(report.percentage, 0);
        assert_eq!(report.correct, 0);
        assert_eq!(report.incorrect(), 3);
    }

    #[test]
    fn unanswered_counts_as_incorrect() {
        let quiz = quiz_with_answers("q", 60, &["a", "b"]);
        let report = score(&quiz, &ledger(&[(0, "a")]));
        assert_eq!(report.per_question_correct, vec![true, false]);
        assert_eq!(report.percentage, 50);
        assert_eq!(report.grade(), Grade::Fair);
    }

    #[test]
    fn rescoring_is_idempotent() {
        let quiz = quiz_with_answers("q", 60, &["a", "b", "c"]);
        let answers = ledger(&[(0, "a"), (2, "b")]);
        assert_eq!(score(&quiz, &answers), score(&quiz, &answers));
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_percentage(1, 3), 33);
        assert_eq!(round_percentage(2, 3), 67);
        assert_eq!(round_percentage(1, 8), 13); // 12.5
        assert_eq!(round_percentage(3, 8), 38); // 37.5
        assert_eq!(round_percentage(1, 200), 1); // 0.5
        assert_eq!(round_percentage(0, 7), 0);
        assert_eq!(round_percentage(7, 7), 100);
    }

    #[test]
    fn grade_bands() {
        assert_eq!(Grade::from_percentage(70), Grade::Passed);
        assert_eq!(Grade::from_percentage(69), Grade::Fair);
        assert_eq!(Grade::from_percentage(50), Grade::Fair);
        assert_eq!(Grade::from_percentage(49), Grade::Failed);
        assert_eq!(Grade::Failed.to_string(), "failed");
    }
}
