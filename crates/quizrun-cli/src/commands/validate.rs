//! The `quizrun validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizrun_core::parser;
use quizrun_core::timer::format_clock;

pub fn execute(quiz_set_path: PathBuf) -> Result<()> {
    let quizzes = if quiz_set_path.is_dir() {
        parser::load_quiz_directory(&quiz_set_path)?
    } else {
        vec![parser::parse_quiz(&quiz_set_path)?]
    };

    if quizzes.is_empty() {
        println!("No quizzes found in {}", quiz_set_path.display());
        return Ok(());
    }

    for quiz in &quizzes {
        println!(
            "Quiz: {} [{}] ({} questions, {})",
            quiz.display_title(),
            quiz.id,
            quiz.question_count(),
            format_clock(quiz.time_limit_secs)
        );
    }

    let warnings = parser::validate_quiz_set(&quizzes);
    for w in &warnings {
        let location = match w.question {
            Some(n) => format!("[{} q{n}]", w.quiz_id),
            None => format!("[{}]", w.quiz_id),
        };
        println!("  {location} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All quizzes valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
