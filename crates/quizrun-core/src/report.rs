//! Session report types with JSON persistence.
//!
//! A report is the record of one submitted session: who took which quiz,
//! when, why it ended, the frozen answers, and the score.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::AnswerLedger;
use crate::model::Quiz;
use crate::scoring::{Grade, ScoreReport};
use crate::session::{Session, SubmissionCause};
use crate::timer::format_clock;

/// A complete record of one submitted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// The quiz as it was taken.
    pub quiz: Quiz,
    /// Identity of the actor.
    pub actor: String,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
    pub cause: SubmissionCause,
    pub answers: AnswerLedger,
    pub score: ScoreReport,
    /// Countdown seconds that elapsed before submission.
    pub elapsed_secs: u64,
}

impl SessionReport {
    /// Build a report from a submitted session; `None` if it is not
    /// submitted yet.
    pub fn from_session(session: &Session) -> Option<Self> {
        let submission = session.submission()?;
        let submitted_at = submission.submitted_at();
        Some(Self {
            id: Uuid::new_v4(),
            quiz: session.quiz().clone(),
            actor: session.actor().unwrap_or_default().to_string(),
            started_at: session.started_at().unwrap_or(submitted_at),
            submitted_at,
            cause: submission.cause(),
            answers: submission.ledger().clone(),
            score: submission.result().clone(),
            elapsed_secs: submission.elapsed_secs(),
        })
    }

    pub fn grade(&self) -> Grade {
        self.score.grade()
    }

    /// File name used when saving into a results directory.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.json",
            self.quiz.id,
            self.submitted_at.format("%Y%m%dT%H%M%S")
        )
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// One-line summary, e.g. `2/3 correct (67%) - fair`.
    pub fn summary_line(&self) -> String {
        format!(
            "{}/{} correct ({}%) - {}",
            self.score.correct,
            self.score.total,
            self.score.percentage,
            self.grade()
        )
    }

    /// Format the report as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str(&format!("# {}\n\n", self.quiz.display_title()));
        md.push_str(&format!(
            "**Result: {}%** ({}) - {}\n\n",
            self.score.percentage,
            self.grade(),
            self.grade().message()
        ));
        md.push_str(&format!(
            "- Taken by: {}\n- Submitted: {} ({})\n- Time used: {}\n\n",
            self.actor,
            self.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.cause,
            format_clock(self.elapsed_secs)
        ));

        md.push_str("| # | Question | Your answer | Correct answer | |\n");
        md.push_str("|---|----------|-------------|----------------|---|\n");
        for (i, question) in self.quiz.questions.iter().enumerate() {
            let yours = self
                .answers
                .get(i)
                .map(|label| {
                    question
                        .option(label)
                        .map_or(label, |o| o.display_text())
                        .to_string()
                })
                .unwrap_or_else(|| "-".to_string());
            let correct = question
                .option(&question.correct_label)
                .map_or(question.correct_label.as_str(), |o| o.display_text());
            let mark = if self.score.per_question_correct.get(i).copied().unwrap_or(false) {
                "✓"
            } else {
                "✗"
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                i + 1,
                question.prompt.replace('|', "\\|"),
                yours.replace('|', "\\|"),
                correct.replace('|', "\\|"),
                mark
            ));
        }
        md
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::access;
    use crate::model::fixtures::quiz_with_answers;
    use crate::model::Actor;

    fn submitted_report() -> SessionReport {
        let quiz = Arc::new(quiz_with_answers("quiz", 60, &["a", "b", "c"]));
        let grant = access::resolve(Some(&Actor::student("s@x")), &quiz).unwrap();
        let mut session = Session::new(quiz);
        session.start(&grant).unwrap();
        session.record_answer(0, "a").unwrap();
        session.record_answer(1, "c").unwrap();
        session.record_answer(2, "c").unwrap();
        session.submit(SubmissionCause::Manual).unwrap();
        SessionReport::from_session(&session).unwrap()
    }

    #[test]
    fn no_report_before_submission() {
        let quiz = Arc::new(quiz_with_answers("quiz", 60, &["a"]));
        assert!(SessionReport::from_session(&Session::new(quiz)).is_none());
    }

    #[test]
    fn report_captures_submission() {
        let report = submitted_report();
        assert_eq!(report.actor, "s@x");
        assert_eq!(report.cause, SubmissionCause::Manual);
        assert_eq!(report.score.percentage, 67);
        assert_eq!(report.summary_line(), "2/3 correct (67%) - fair");
        assert!(report.file_name().starts_with("quiz-"));
    }

    #[test]
    fn save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.json");
        let report = submitted_report();
        report.save_json(&path).unwrap();

        let loaded = SessionReport::load_json(&path).unwrap();
        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.answers, report.answers);
        assert_eq!(loaded.score, report.score);
    }

    #[test]
    fn markdown_marks_each_question() {
        let md = submitted_report().to_markdown();
        assert!(md.contains("**Result: 67%** (fair)"));
        assert!(md.contains("| 2 | Question 2 | c | b | ✗ |"));
        assert!(md.contains("| 1 | Question 1 | a | a | ✓ |"));
    }
}
