//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizrun() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quizrun").unwrap()
}

/// Write a config that reads the sample quizzes and saves reports under
/// `dir/results`. `tick_ms` is the wall-clock length of a quiz second.
fn write_config(dir: &Path, tick_ms: u64) -> PathBuf {
    let quiz_dir = std::fs::canonicalize("../../quizzes").unwrap();
    let config = format!(
        r#"
quiz_dir = '{}'
results_dir = '{}'
tick_ms = {tick_ms}
low_time_warning_secs = 1

[users."admin@example.com"]
role = "admin"

[users."student@example.com"]

[users."outsider@example.com"]
allowed_tests = ["sprint"]
"#,
        quiz_dir.display(),
        dir.join("results").display()
    );
    let path = dir.join("quizrun.toml");
    std::fs::write(&path, config).unwrap();
    path
}

fn saved_reports(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let results = dir.join("results");
    if !results.exists() {
        return Vec::new();
    }
    std::fs::read_dir(results)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == extension))
        .collect()
}

#[test]
fn take_and_submit_all_correct() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), 20);

    quizrun()
        .args(["take", "--quiz", "rust-basics", "--user", "student@example.com"])
        .arg("--config")
        .arg(&config)
        .write_stdin("1 let mut\n2 b\nstatus\n3 a\nsubmit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust Basics"))
        .stdout(predicate::str::contains("2/3 answered"))
        .stdout(predicate::str::contains("Result: 100% (3/3 correct, passed)"))
        .stdout(predicate::str::contains("Report saved to"));

    assert_eq!(saved_reports(dir.path(), "json").len(), 1);
    assert!(saved_reports(dir.path(), "html").is_empty());
}

#[test]
fn rejected_answers_and_early_submit_are_reported() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), 20);

    quizrun()
        .args(["take", "--quiz", "rust-basics", "--user", "student@example.com"])
        .arg("--config")
        .arg(&config)
        .write_stdin("1 zzz\n9 a\nsubmit\nhello\n1 const\n2 a\n3 b\nsubmit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("'zzz' is not an option of question 1"))
        .stderr(predicate::str::contains("question 9 does not exist"))
        .stderr(predicate::str::contains("Cannot submit yet"))
        .stderr(predicate::str::contains("Unrecognized input 'hello'"))
        .stdout(predicate::str::contains("Result: 0% (0/3 correct, failed)"));
}

#[test]
fn closed_input_waits_for_timeout() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), 200);

    quizrun()
        .args(["take", "--quiz", "sprint", "--user", "student@example.com"])
        .arg("--config")
        .arg(&config)
        .write_stdin("1 4\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Time is up"))
        .stdout(predicate::str::contains("Result: 50% (1/2 correct, fair)"));

    let report = std::fs::read_to_string(&saved_reports(dir.path(), "json")[0]).unwrap();
    assert!(report.contains("\"cause\": \"timeout\""));
}

#[test]
fn take_writes_html_review_and_review_renders_it() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), 20);

    quizrun()
        .args(["take", "--quiz", "capitals", "--user", "student@example.com", "--html"])
        .arg("--config")
        .arg(&config)
        .write_stdin("1 Paris\n2 Milan\nsubmit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Review page saved to"));

    let html = saved_reports(dir.path(), "html");
    assert_eq!(html.len(), 1);
    let page = std::fs::read_to_string(&html[0]).unwrap();
    assert!(page.contains("Milan ✗ Your answer"));

    let json = &saved_reports(dir.path(), "json")[0];
    quizrun()
        .arg("review")
        .arg("--report")
        .arg(json)
        .args(["--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# European Capitals"))
        .stdout(predicate::str::contains("**Result: 50%** (fair)"));

    let out = dir.path().join("review.html");
    quizrun()
        .arg("review")
        .arg("--report")
        .arg(json)
        .args(["--format", "html", "--output"])
        .arg(&out)
        .assert()
        .success();
    assert!(std::fs::read_to_string(out).unwrap().contains("<html"));
}

#[test]
fn personal_allow_list_denies_other_quizzes() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), 20);

    quizrun()
        .args(["take", "--quiz", "rust-basics", "--user", "outsider@example.com"])
        .arg("--config")
        .arg(&config)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("access denied"))
        .stderr(predicate::str::contains("not in the allowed tests"));

    assert!(saved_reports(dir.path(), "json").is_empty());
}

#[test]
fn unknown_user_is_asked_to_sign_in() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), 20);

    quizrun()
        .args(["take", "--quiz", "rust-basics", "--user", "nobody@example.com"])
        .arg("--config")
        .arg(&config)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("sign in required"));
}

#[test]
fn unknown_quiz_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), 20);

    quizrun()
        .args(["take", "--quiz", "nope", "--user", "admin@example.com"])
        .arg("--config")
        .arg(&config)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("quiz not found: nope"));
}

#[test]
fn list_shows_visible_quizzes() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), 20);

    quizrun()
        .args(["list", "--user", "student@example.com"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("rust-basics"))
        .stdout(predicate::str::contains("capitals"))
        .stdout(predicate::str::contains("15 min"));

    quizrun()
        .args(["list", "--user", "outsider@example.com"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("sprint"))
        .stdout(predicate::str::contains("capitals").not());

    quizrun()
        .args(["list", "--user", "nobody@example.com"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("not a known user"));
}

#[test]
fn validate_quiz_directory() {
    quizrun()
        .arg("validate")
        .arg("--quiz-set")
        .arg("../../quizzes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust Basics"))
        .stdout(predicate::str::contains("European Capitals"))
        .stdout(predicate::str::contains("All quizzes valid"));
}

#[test]
fn validate_single_file() {
    quizrun()
        .arg("validate")
        .arg("--quiz-set")
        .arg("../../quizzes/capitals.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions, 15:00"));
}

#[test]
fn validate_nonexistent_file() {
    quizrun()
        .arg("validate")
        .arg("--quiz-set")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn review_nonexistent_report() {
    quizrun()
        .arg("review")
        .arg("--report")
        .arg("no_such_report.json")
        .assert()
        .failure();
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizrun()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizrun.toml"))
        .stdout(predicate::str::contains("Created quizzes/example.toml"));

    assert!(dir.path().join("quizrun.toml").exists());

    quizrun()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--quiz-set")
        .arg("quizzes/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All quizzes valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizrun().current_dir(dir.path()).arg("init").assert().success();

    quizrun()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    quizrun()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timed quiz session engine"));
}

#[test]
fn version_output() {
    quizrun()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizrun"));
}
