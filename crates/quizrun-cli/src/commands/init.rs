//! The `quizrun init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizrun.toml").exists() {
        println!("quizrun.toml already exists, skipping.");
    } else {
        std::fs::write("quizrun.toml", SAMPLE_CONFIG)?;
        println!("Created quizrun.toml");
    }

    std::fs::create_dir_all("quizzes")?;
    let example_path = Path::new("quizzes/example.toml");
    if example_path.exists() {
        println!("quizzes/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUIZ)?;
        println!("Created quizzes/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit the [users] table in quizrun.toml");
    println!("  2. Run: quizrun validate --quiz-set quizzes");
    println!("  3. Run: quizrun take --quiz example --user student@example.com");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizrun configuration

quiz_dir = "./quizzes"
results_dir = "./quizrun-results"
cache_ttl_secs = 300
low_time_warning_secs = 300

# Uncomment to read quizzes from a remote document store instead.
# [remote]
# base_url = "https://quizzes.example.com/api"
# api_key = "${QUIZRUN_API_KEY}"

[users."admin@example.com"]
role = "admin"

[users."student@example.com"]
role = "student"
# When set, only these quizzes may be taken, whatever their own allow-lists say.
# allowed_tests = ["example"]
"#;

const EXAMPLE_QUIZ: &str = r#"[quiz]
id = "example"
title = "Example Quiz"
description = "A short quiz to get started"
time_limit_minutes = 5

[[questions]]
prompt = "Which planet is closest to the Sun?"
options = ["Mercury", "Venus", "Mars"]
correct = "Mercury"

[[questions]]
prompt = "How many continents are there?"
correct = "c"

[[questions.options]]
label = "a"
text = "Five"

[[questions.options]]
label = "b"
text = "Six"

[[questions.options]]
label = "c"
text = "Seven"
"#;
