//! In-memory quiz store for testing.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use quizrun_core::error::QuizError;
use quizrun_core::model::Quiz;

use crate::store::QuizStore;

/// A quiz store backed by a fixed list, counting every call.
pub struct MockStore {
    quizzes: Vec<Quiz>,
    fetch_count: AtomicU32,
    list_count: AtomicU32,
}

impl MockStore {
    pub fn new(quizzes: Vec<Quiz>) -> Self {
        Self {
            quizzes,
            fetch_count: AtomicU32::new(0),
            list_count: AtomicU32::new(0),
        }
    }

    /// Number of `fetch` calls made so far.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    /// Number of `list` calls made so far.
    pub fn list_count(&self) -> u32 {
        self.list_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QuizStore for MockStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, id: &str) -> anyhow::Result<Quiz> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        self.quizzes
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| QuizError::QuizNotFound(id.to_string()).into())
    }

    async fn list(&self) -> anyhow::Result<Vec<Quiz>> {
        self.list_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.quizzes.clone())
    }
}

/// A valid two-question quiz with answers `a` then `b`.
#[cfg(test)]
pub(crate) fn sample_quiz(id: &str) -> Quiz {
    use quizrun_core::model::{AnswerOption, Question};

    Quiz {
        id: id.into(),
        title: format!("Quiz {id}"),
        description: String::new(),
        time_limit_secs: 600,
        questions: ["a", "b"]
            .iter()
            .map(|correct| Question {
                prompt: format!("Pick {correct}"),
                image: None,
                options: vec![AnswerOption::plain("a"), AnswerOption::plain("b")],
                correct_label: (*correct).to_string(),
            })
            .collect(),
        allowed_users: Vec::new(),
    }
}
