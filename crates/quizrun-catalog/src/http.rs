//! Quiz store over a remote HTTP document API.
//!
//! `GET {base_url}/quizzes` returns `[{"id": ...}, ...]` and
//! `GET {base_url}/quizzes/{id}` returns one quiz document in the stored
//! JSON shape (`q`, `answer`, `timeLimit` in minutes, ...).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use tracing::instrument;

use quizrun_core::error::QuizError;
use quizrun_core::model::Quiz;
use quizrun_core::parser;

use crate::error::CatalogError;
use crate::store::QuizStore;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_CONCURRENT_FETCHES: usize = 4;

/// Remote quiz store.
pub struct HttpStore {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct QuizSummary {
    id: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

impl HttpStore {
    pub fn new(base_url: &str, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, CatalogError> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                CatalogError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                CatalogError::NetworkError(e.to_string())
            }
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::AuthenticationFailed(body));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(CatalogError::ApiError { status, message });
        }
        Ok(response)
    }
}

#[async_trait]
impl QuizStore for HttpStore {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self))]
    async fn fetch(&self, id: &str) -> anyhow::Result<Quiz> {
        let url = format!("{}/quizzes/{id}", self.base_url);
        let response = self.get(&url).await?;
        if response.status().as_u16() == 404 {
            return Err(QuizError::QuizNotFound(id.to_string()).into());
        }
        let body = Self::check_status(response).await?.text().await.map_err(|e| {
            CatalogError::NetworkError(format!("failed to read quiz {id}: {e}"))
        })?;

        // Stored documents may omit the id; the URL is authoritative.
        let mut document: serde_json::Value = serde_json::from_str(&body)
            .with_context(|| format!("quiz {id} is not a JSON document"))?;
        if let Some(fields) = document.as_object_mut() {
            fields
                .entry("id")
                .or_insert_with(|| serde_json::Value::String(id.to_string()));
        }

        let quiz = parser::parse_quiz_str(&document.to_string(), &PathBuf::from(format!("{id}.json")))?;
        tracing::debug!(quiz = %quiz.id, questions = quiz.question_count(), "fetched remote quiz");
        Ok(quiz)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> anyhow::Result<Vec<Quiz>> {
        let url = format!("{}/quizzes", self.base_url);
        let response = self.get(&url).await?;
        if response.status().as_u16() == 404 {
            return Err(CatalogError::NotFound(url).into());
        }
        let summaries: Vec<QuizSummary> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| CatalogError::ApiError {
                status: 0,
                message: format!("failed to parse quiz listing: {e}"),
            })?;

        let fetched: Vec<(String, anyhow::Result<Quiz>)> = futures::stream::iter(summaries)
            .map(|summary| async move {
                let result = self.fetch(&summary.id).await;
                (summary.id, result)
            })
            .buffered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        // Transport and auth failures end the listing; a bad document only
        // drops its own quiz.
        let mut quizzes = Vec::with_capacity(fetched.len());
        for (id, result) in fetched {
            match result {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) if e.downcast_ref::<CatalogError>().is_some() => return Err(e),
                Err(e) => {
                    tracing::warn!("skipping remote quiz {}: {:#}", id, e);
                }
            }
        }
        Ok(quizzes)
    }
}
