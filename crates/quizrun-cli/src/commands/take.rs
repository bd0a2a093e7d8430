//! The `quizrun take` command.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use quizrun_catalog::{create_store, load_config_from, ActorDirectory};
use quizrun_core::access;
use quizrun_core::engine::{SessionEngine, SessionHandle, SessionObserver};
use quizrun_core::error::SessionError;
use quizrun_core::model::Quiz;
use quizrun_core::report::SessionReport;
use quizrun_core::session::{Outcome, Submission, SubmissionCause};
use quizrun_core::timer::format_clock;
use quizrun_report::html::write_html_report;
use quizrun_report::text::render_text;

/// Console observer: countdown notices on stderr.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_tick(&self, remaining_secs: u64) {
        if remaining_secs > 0 && remaining_secs % 60 == 0 {
            eprintln!("  {} remaining", format_clock(remaining_secs));
        }
    }

    fn on_low_time(&self, remaining_secs: u64) {
        eprintln!("  Hurry up: only {} left!", format_clock(remaining_secs));
    }

    fn on_answer(&self, index: usize, label: &str, outcome: &Result<Outcome, SessionError>) {
        if let Err(e) = outcome {
            tracing::debug!(question = index + 1, label, error = %e, "answer rejected");
        }
    }

    fn on_submitted(&self, submission: &Submission) {
        if submission.cause() == SubmissionCause::Timeout {
            eprintln!("\nTime is up! Your answers were submitted automatically.");
        }
    }
}

pub async fn execute(
    quiz_id: String,
    user: String,
    config_path: Option<PathBuf>,
    html: bool,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let directory = ActorDirectory::from_config(&config);
    let store = create_store(&config)?;

    let quiz = Arc::new(store.fetch(&quiz_id).await?);

    let actor = directory.lookup(&user);
    let grant = match access::resolve(actor, &quiz) {
        Ok(grant) => grant,
        Err(e) if e.requires_login() => {
            anyhow::bail!("{e}: '{user}' is not a known user; add it under [users] in quizrun.toml")
        }
        Err(e) => return Err(e.into()),
    };

    print_quiz(&quiz);

    let handle = SessionEngine::start(
        quiz.clone(),
        &grant,
        config.engine_config(),
        Arc::new(ConsoleObserver),
    )?;

    let mut input = spawn_stdin_reader();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            _ = handle.submitted() => break,
            line = input.recv(), if stdin_open => {
                match line {
                    Some(line) => handle_line(&handle, &quiz, line.trim()).await,
                    None => {
                        stdin_open = false;
                        if !handle.snapshot().is_submitted() {
                            eprintln!("Input closed; the session ends when the timer runs out.");
                        }
                    }
                }
            }
        }
    }

    let session = handle.finish().await?;
    let report = SessionReport::from_session(&session)
        .context("session ended without a submission")?;

    println!("\n{}", render_text(&report));

    let json_path = config.results_dir.join(report.file_name());
    report.save_json(&json_path)?;
    println!("Report saved to {}", json_path.display());

    if html {
        let html_path = json_path.with_extension("html");
        write_html_report(&report, &html_path)?;
        println!("Review page saved to {}", html_path.display());
    }

    Ok(())
}

/// Forward stdin lines from a plain thread, so a pending read never holds
/// up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn print_quiz(quiz: &Quiz) {
    println!("{}", quiz.display_title());
    if !quiz.description.trim().is_empty() {
        println!("{}", quiz.description.trim());
    }
    println!(
        "{} question(s), time limit {}\n",
        quiz.question_count(),
        format_clock(quiz.time_limit_secs)
    );

    for (i, question) in quiz.questions.iter().enumerate() {
        println!("{}. {}", i + 1, question.prompt);
        if let Some(image) = &question.image {
            println!("   (image: {image})");
        }
        for option in &question.options {
            println!("   [{}] {}", option.label, option.display_text());
        }
    }

    println!("\nAnswer with `<question> <label>`, `status` to see progress, `submit` to finish.");
}

async fn handle_line(handle: &SessionHandle, quiz: &Quiz, line: &str) {
    match line {
        "" => {}
        "submit" => match handle.submit().await {
            Ok(_) => {}
            Err(e) => eprintln!("Cannot submit yet: {e}"),
        },
        "status" => {
            let snapshot = handle.snapshot();
            println!(
                "{}/{} answered, {} remaining",
                snapshot.answered,
                snapshot.question_count,
                format_clock(snapshot.remaining_secs)
            );
        }
        _ => match parse_answer(line) {
            Some((number, label)) if number >= 1 => {
                match handle.record_answer(number - 1, label).await {
                    Ok(Outcome::Accepted) => {
                        let answered = handle.snapshot().answered;
                        println!("Recorded. {answered}/{} answered.", quiz.question_count());
                    }
                    Ok(Outcome::Ignored) => {}
                    Err(e) => eprintln!("Rejected: {e}"),
                }
            }
            _ => eprintln!("Unrecognized input '{line}'. Use `<question> <label>`, `status` or `submit`."),
        },
    }
}

/// Split `<question-number> <label>`; the label may contain spaces.
fn parse_answer(line: &str) -> Option<(usize, &str)> {
    let (number, label) = line.split_once(char::is_whitespace)?;
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    Some((number.parse().ok()?, label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_answer_lines() {
        assert_eq!(parse_answer("1 a"), Some((1, "a")));
        assert_eq!(parse_answer("2   New York "), Some((2, "New York")));
        assert_eq!(parse_answer("x a"), None);
        assert_eq!(parse_answer("3"), None);
        assert_eq!(parse_answer("3 "), None);
    }
}
