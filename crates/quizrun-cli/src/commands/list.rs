//! The `quizrun list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizrun_catalog::{create_store, list_visible, load_config_from, ActorDirectory};
use quizrun_core::timer::{format_clock, format_duration_minutes};

pub async fn execute(user: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let directory = ActorDirectory::from_config(&config);

    let Some(actor) = directory.lookup(&user) else {
        println!("'{user}' is not a known user. Add it under [users] in quizrun.toml to sign in.");
        return Ok(());
    };

    let store = create_store(&config)?;
    let quizzes = list_visible(store.as_ref(), Some(actor)).await?;

    if quizzes.is_empty() {
        println!("No quizzes available for {user}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Title", "Questions", "Time limit"]);
    for quiz in &quizzes {
        table.add_row(vec![
            Cell::new(&quiz.id),
            Cell::new(quiz.display_title()),
            Cell::new(quiz.question_count()),
            Cell::new(time_limit(quiz.time_limit_secs)),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn time_limit(secs: u64) -> String {
    if secs % 60 == 0 {
        format_duration_minutes(secs / 60)
    } else {
        format_clock(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_limit_prefers_minutes() {
        assert_eq!(time_limit(5400), "1 h 30 min");
        assert_eq!(time_limit(600), "10 min");
        assert_eq!(time_limit(90), "01:30");
    }
}
