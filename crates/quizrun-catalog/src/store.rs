//! The quiz store abstraction.

use async_trait::async_trait;

use quizrun_core::access;
use quizrun_core::model::{Actor, Quiz};

/// A source of quiz definitions.
///
/// `fetch` reports a missing quiz as
/// [`QuizError::QuizNotFound`](quizrun_core::error::QuizError::QuizNotFound)
/// wrapped in the returned `anyhow::Error`.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Fetch one quiz by id.
    async fn fetch(&self, id: &str) -> anyhow::Result<Quiz>;

    /// All quizzes in the store.
    async fn list(&self) -> anyhow::Result<Vec<Quiz>>;
}

/// List the quizzes `actor` may start.
///
/// Filters through the access resolver, so a quiz shows up here exactly
/// when starting it would be authorized.
pub async fn list_visible(
    store: &dyn QuizStore,
    actor: Option<&Actor>,
) -> anyhow::Result<Vec<Quiz>> {
    let quizzes = store.list().await?;
    let visible = access::visible_quizzes(actor, &quizzes)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    tracing::debug!(
        store = store.name(),
        total = quizzes.len(),
        visible = visible.len(),
        "listed quizzes"
    );
    Ok(visible)
}
