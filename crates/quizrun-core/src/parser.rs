//! Quiz file loader.
//!
//! Reads quizzes from TOML or JSON, normalizes both option schemes into
//! label-keyed [`AnswerOption`]s, and validates the result before anything
//! can start a session with it.
//!
//! TOML files carry a `[quiz]` header and `[[questions]]` tables. JSON files
//! use the flat stored-document shape (`q`, `qImage`, `answer`, `timeLimit`
//! in minutes, `allowedUsers`).

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::QuizError;
use crate::model::{AnswerOption, Question, Quiz};

#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: RawQuizHeader,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct JsonQuizDocument {
    #[serde(flatten)]
    header: RawQuizHeader,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuizHeader {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default, alias = "timeLimitSecs")]
    time_limit_secs: Option<u64>,
    #[serde(default, alias = "timeLimit")]
    time_limit_minutes: Option<u64>,
    #[serde(default, alias = "allowedUsers")]
    allowed_users: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default, alias = "q")]
    prompt: String,
    #[serde(default, alias = "qImage")]
    image: Option<String>,
    #[serde(default)]
    options: Vec<RawOption>,
    #[serde(alias = "answer")]
    correct: String,
}

/// Legacy documents store options as plain strings; current ones as
/// `{label, text, image}` records.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOption {
    Legacy(String),
    Labeled {
        label: String,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        image: Option<String>,
    },
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_option(raw: RawOption) -> Option<AnswerOption> {
    match raw {
        RawOption::Legacy(text) if text.trim().is_empty() => None,
        RawOption::Legacy(text) => Some(AnswerOption::plain(text)),
        RawOption::Labeled { label, text, image } => Some(AnswerOption {
            label,
            text: non_blank(text),
            image: non_blank(image),
        }),
    }
}

fn normalize(header: RawQuizHeader, questions: Vec<RawQuestion>) -> Result<Quiz, QuizError> {
    let time_limit_secs = match (header.time_limit_secs, header.time_limit_minutes) {
        (Some(secs), _) => secs,
        (None, Some(minutes)) => minutes.checked_mul(60).ok_or_else(|| {
            QuizError::invalid(&header.id, format!("time limit of {minutes} minutes is too large"))
        })?,
        (None, None) => return Err(QuizError::invalid(&header.id, "missing time limit")),
    };

    let questions = questions
        .into_iter()
        .map(|q| Question {
            prompt: q.prompt,
            image: non_blank(q.image),
            options: q.options.into_iter().filter_map(normalize_option).collect(),
            correct_label: q.correct,
        })
        .collect();

    let quiz = Quiz {
        id: header.id,
        title: header.title,
        description: header.description,
        time_limit_secs,
        questions,
        allowed_users: header.allowed_users,
    };
    quiz.validate()?;
    Ok(quiz)
}

/// Parse a single quiz file. The extension picks the format.
///
/// # Errors
///
/// A missing file is reported as `QuizError::QuizNotFound`, a malformed one
/// as `QuizError::InvalidQuizDefinition` or a parse error.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(QuizError::QuizNotFound(path.display().to_string()).into());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read quiz file: {}", path.display()))
        }
    };

    parse_quiz_str(&content, path)
}

/// Parse quiz text (useful for testing). `source_path` decides the format:
/// `.json` is JSON, anything else TOML.
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let is_json = source_path.extension().is_some_and(|ext| ext == "json");

    let (header, questions) = if is_json {
        let doc: JsonQuizDocument = serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;
        (doc.header, doc.questions)
    } else {
        let file: TomlQuizFile = toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
        (file.quiz, file.questions)
    };

    let quiz = normalize(header, questions)
        .with_context(|| format!("rejected quiz file: {}", source_path.display()))?;
    Ok(quiz)
}

fn is_quiz_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "toml" || ext == "json")
}

/// Recursively load all `.toml` and `.json` quiz files from a directory.
///
/// Files that fail to load are skipped with a warning.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if is_quiz_file(&path) {
            match parse_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// A warning from quiz validation. Unlike `InvalidQuizDefinition`, a
/// warning does not stop the quiz from being taken.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub quiz_id: String,
    /// 1-based question number, if the warning is about one question.
    pub question: Option<usize>,
    pub message: String,
}

/// Check a loaded quiz for suspicious but legal content.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let warn = |question: Option<usize>, message: String| ValidationWarning {
        quiz_id: quiz.id.clone(),
        question,
        message,
    };

    if quiz.title.trim().is_empty() {
        warnings.push(warn(None, "title is empty".into()));
    }

    if quiz.time_limit_secs == 0 {
        warnings.push(warn(
            None,
            "time limit is zero; sessions will time out immediately".into(),
        ));
    }

    for (i, question) in quiz.questions.iter().enumerate() {
        if question.options.len() < 2 {
            warnings.push(warn(
                Some(i + 1),
                format!("only {} option(s)", question.options.len()),
            ));
        }
    }

    warnings
}

/// Validate every quiz and additionally flag duplicate ids across the set.
pub fn validate_quiz_set(quizzes: &[Quiz]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_ids = HashSet::new();

    for quiz in quizzes {
        if !seen_ids.insert(quiz.id.as_str()) {
            warnings.push(ValidationWarning {
                quiz_id: quiz.id.clone(),
                question: None,
                message: format!("duplicate quiz ID: {}", quiz.id),
            });
        }
        warnings.extend(validate_quiz(quiz));
    }

    warnings
}
