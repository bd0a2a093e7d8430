//! Configuration loading and store factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizrun_core::engine::EngineConfig;
use quizrun_core::model::Role;

use crate::cache::CachedStore;
use crate::directory::DirectoryStore;
use crate::http::HttpStore;
use crate::store::QuizStore;

/// Remote quiz store settings.
///
/// Note: Custom Debug impl masks the API key.
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// One entry of the `[users]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub allowed_tests: Vec<String>,
}

fn default_role() -> Role {
    Role::Student
}

/// Top-level quizrun configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizrunConfig {
    /// Directory (or single file) of local quizzes.
    #[serde(default = "default_quiz_dir")]
    pub quiz_dir: PathBuf,
    /// Where session reports are written.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Lifetime of cached quiz reads.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Wall-clock milliseconds per countdown second.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_low_time_warning")]
    pub low_time_warning_secs: u64,
    /// Use a remote store instead of `quiz_dir`.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
    /// Known actors keyed by email.
    #[serde(default)]
    pub users: HashMap<String, UserEntry>,
}

fn default_quiz_dir() -> PathBuf {
    PathBuf::from("./quizzes")
}
fn default_results_dir() -> PathBuf {
    PathBuf::from("./quizrun-results")
}
fn default_cache_ttl() -> u64 {
    300
}
fn default_tick_ms() -> u64 {
    1000
}
fn default_low_time_warning() -> u64 {
    300
}

impl Default for QuizrunConfig {
    fn default() -> Self {
        Self {
            quiz_dir: default_quiz_dir(),
            results_dir: default_results_dir(),
            cache_ttl_secs: default_cache_ttl(),
            tick_ms: default_tick_ms(),
            low_time_warning_secs: default_low_time_warning(),
            remote: None,
            users: HashMap::new(),
        }
    }
}

impl QuizrunConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            tick: Duration::from_millis(self.tick_ms.max(1)),
            low_time_warning_secs: self.low_time_warning_secs,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizrun.toml` in the current directory
/// 2. `~/.config/quizrun/config.toml`
///
/// Environment variable override: `QUIZRUN_API_KEY` (remote store key).
pub fn load_config() -> Result<QuizrunConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizrunConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizrun.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuizrunConfig::default(),
    };

    if let (Ok(key), Some(remote)) = (std::env::var("QUIZRUN_API_KEY"), config.remote.as_mut()) {
        remote.api_key = Some(key);
    }

    Ok(config)
}

/// Parse config text and expand `${VAR}` references.
pub fn parse_config(content: &str) -> Result<QuizrunConfig> {
    let mut config: QuizrunConfig = toml::from_str(content)?;
    config.quiz_dir = resolve_path(&config.quiz_dir);
    config.results_dir = resolve_path(&config.results_dir);
    if let Some(remote) = config.remote.as_mut() {
        remote.base_url = resolve_env_vars(&remote.base_url);
        remote.api_key = remote.api_key.as_deref().map(resolve_env_vars);
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizrun"))
}

/// Create the configured quiz store, wrapped in a TTL cache.
pub fn create_store(config: &QuizrunConfig) -> Result<Box<dyn QuizStore>> {
    let ttl = config.cache_ttl();
    match &config.remote {
        Some(remote) => {
            let store = HttpStore::new(&remote.base_url, remote.api_key.clone())?;
            Ok(Box::new(CachedStore::new(store, ttl)))
        }
        None => Ok(Box::new(CachedStore::new(
            DirectoryStore::new(&config.quiz_dir),
            ttl,
        ))),
    }
}
