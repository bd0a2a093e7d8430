//! Time-to-live cache and a caching quiz store.
//!
//! Keys follow `quiz:<id>` for single quizzes and `quizzes:all` for the
//! full listing. Expired entries are dropped on lookup.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use quizrun_core::model::Quiz;

use crate::store::QuizStore;

/// Cache key of the full quiz listing.
pub const ALL_QUIZZES_KEY: &str = "quizzes:all";

/// Cache key of one quiz.
pub fn quiz_key(id: &str) -> String {
    format!("quiz:{id}")
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// A string-keyed cache whose entries expire `ttl` after insertion.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The value under `key` if it is still fresh.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries();
        let entry = entries.get(key)?;
        if entry.inserted_at.elapsed() < self.ttl {
            return Some(entry.value.clone());
        }
        entries.remove(key);
        None
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.entries().insert(
            key.into(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every entry whose key contains `pattern`. Returns how many were
    /// dropped.
    pub fn invalidate(&self, pattern: &str) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| !key.contains(pattern));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
enum Cached {
    Quiz(Quiz),
    Listing(Vec<Quiz>),
}

/// Wraps a store and serves repeated reads from a [`TtlCache`].
pub struct CachedStore<S> {
    inner: S,
    cache: TtlCache<Cached>,
}

impl<S: QuizStore> CachedStore<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop cached entries whose key contains `pattern`.
    pub fn invalidate(&self, pattern: &str) -> usize {
        let dropped = self.cache.invalidate(pattern);
        tracing::debug!(pattern, dropped, "invalidated quiz cache");
        dropped
    }
}

#[async_trait]
impl<S: QuizStore> QuizStore for CachedStore<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, id: &str) -> anyhow::Result<Quiz> {
        let key = quiz_key(id);
        if let Some(Cached::Quiz(quiz)) = self.cache.get(&key) {
            tracing::debug!(%key, "cache hit");
            return Ok(quiz);
        }
        let quiz = self.inner.fetch(id).await?;
        self.cache.insert(key, Cached::Quiz(quiz.clone()));
        Ok(quiz)
    }

    async fn list(&self) -> anyhow::Result<Vec<Quiz>> {
        if let Some(Cached::Listing(quizzes)) = self.cache.get(ALL_QUIZZES_KEY) {
            tracing::debug!(key = ALL_QUIZZES_KEY, "cache hit");
            return Ok(quizzes);
        }
        let quizzes = self.inner.list().await?;
        for quiz in &quizzes {
            self.cache
                .insert(quiz_key(&quiz.id), Cached::Quiz(quiz.clone()));
        }
        self.cache
            .insert(ALL_QUIZZES_KEY, Cached::Listing(quizzes.clone()));
        Ok(quizzes)
    }
}
