//! Quiz store over a local directory of quiz files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;

use quizrun_core::error::QuizError;
use quizrun_core::model::Quiz;
use quizrun_core::parser;

use crate::error::CatalogError;
use crate::store::QuizStore;

/// Serves the `.toml`/`.json` quizzes found under one directory.
///
/// A single quiz file can also be used as the root.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load_all(root: &Path) -> anyhow::Result<Vec<Quiz>> {
        if !root.exists() {
            return Err(CatalogError::NotFound(root.display().to_string()).into());
        }
        if root.is_file() {
            Ok(vec![parser::parse_quiz(root)?])
        } else {
            parser::load_quiz_directory(root)
        }
    }

    /// The load error of an invalid quiz file under `path` that declares `id`.
    fn rejection(path: &Path, id: &str) -> Option<anyhow::Error> {
        if path.is_file() {
            let err = parser::parse_quiz(path).err()?;
            let declares_id = matches!(
                err.downcast_ref::<QuizError>(),
                Some(QuizError::InvalidQuizDefinition { quiz_id, .. }) if quiz_id == id
            );
            return declares_id.then_some(err);
        }
        let mut paths: Vec<PathBuf> = std::fs::read_dir(path)
            .ok()?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        paths.sort();
        paths
            .into_iter()
            .filter(|p| p.is_dir() || p.extension().is_some_and(|ext| ext == "toml" || ext == "json"))
            .find_map(|p| Self::rejection(&p, id))
    }
}

#[async_trait]
impl QuizStore for DirectoryStore {
    fn name(&self) -> &str {
        "directory"
    }

    /// Invalid files are skipped by [`list`](QuizStore::list), so a miss
    /// rescans them: a file that declares `id` but fails validation yields
    /// its `InvalidQuizDefinition` rather than `QuizNotFound`.
    async fn fetch(&self, id: &str) -> anyhow::Result<Quiz> {
        if let Some(quiz) = self.list().await?.into_iter().find(|q| q.id == id) {
            return Ok(quiz);
        }
        let root = self.root.clone();
        let wanted = id.to_string();
        let rejected = tokio::task::spawn_blocking(move || Self::rejection(&root, &wanted))
            .await
            .context("quiz loader task failed")?;
        Err(rejected.unwrap_or_else(|| QuizError::QuizNotFound(id.to_string()).into()))
    }

    async fn list(&self) -> anyhow::Result<Vec<Quiz>> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || Self::load_all(&root))
            .await
            .context("quiz loader task failed")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIZ: &str = r#"
[quiz]
id = "rust-basics"
title = "Rust basics"
time_limit_minutes = 10

[[questions]]
prompt = "Which keyword declares an immutable binding?"
options = ["let", "mut", "static"]
correct = "let"
"#;

    #[tokio::test]
    async fn fetch_by_id() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("basics.toml"), QUIZ).unwrap();
        let store = DirectoryStore::new(dir.path());

        let quiz = store.fetch("rust-basics").await.unwrap();
        assert_eq!(quiz.time_limit_secs, 600);
        assert_eq!(quiz.questions[0].correct_label, "let");

        let err = store.fetch("missing").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuizError>(),
            Some(QuizError::QuizNotFound(_))
        ));
    }

    #[tokio::test]
    async fn fetch_reports_why_a_quiz_was_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("basics.toml"), QUIZ).unwrap();
        std::fs::create_dir(dir.path().join("drafts")).unwrap();
        std::fs::write(
            dir.path().join("drafts/empty.toml"),
            "[quiz]\nid = \"empty\"\ntitle = \"Empty\"\ntime_limit_minutes = 5\n",
        )
        .unwrap();
        let store = DirectoryStore::new(dir.path());

        assert_eq!(store.list().await.unwrap().len(), 1);

        let err = store.fetch("empty").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuizError>(),
            Some(QuizError::InvalidQuizDefinition { quiz_id, .. }) if quiz_id == "empty"
        ));
        assert!(format!("{err:#}").contains("no questions"));

        let err = store.fetch("other").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuizError>(),
            Some(QuizError::QuizNotFound(_))
        ));
    }

    #[tokio::test]
    async fn single_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basics.toml");
        std::fs::write(&path, QUIZ).unwrap();

        let quizzes = DirectoryStore::new(&path).list().await.unwrap();
        assert_eq!(quizzes.len(), 1);
    }

    #[tokio::test]
    async fn missing_root_is_not_found() {
        let store = DirectoryStore::new("/definitely/not/a/quiz/dir");
        let err = store.list().await.unwrap_err();
        let catalog = err.downcast_ref::<CatalogError>().unwrap();
        assert!(catalog.is_permanent());
    }
}
