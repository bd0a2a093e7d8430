//! HTML review page.
//!
//! Produces a self-contained HTML file with all CSS inlined: the score
//! headline, then every question with the correct option and any wrong
//! chosen option marked.

use anyhow::{Context, Result};
use std::path::Path;

use quizrun_core::model::{AnswerOption, Question};
use quizrun_core::report::SessionReport;
use quizrun_core::scoring::Grade;
use quizrun_core::timer::format_clock;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn grade_class(grade: Grade) -> &'static str {
    match grade {
        Grade::Passed => "passed",
        Grade::Fair => "fair",
        Grade::Failed => "failed",
    }
}

/// Generate the review page for a submitted session.
pub fn generate_html(report: &SessionReport) -> String {
    let mut html = String::new();
    let title = html_escape(report.quiz.display_title());
    let grade = report.grade();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>quizrun review: {title}</title>\n"));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));
    html.push_str(&format!(
        "<p class=\"meta\">{} | submitted {} ({}) | time used {}</p>\n",
        html_escape(&report.actor),
        report.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.cause,
        format_clock(report.elapsed_secs)
    ));
    html.push_str("</header>\n");

    // Headline
    html.push_str(&format!(
        "<section class=\"headline {}\">\n",
        grade_class(grade)
    ));
    html.push_str(&format!(
        "<h2>Result: {}%</h2>\n<p>{}</p>\n",
        report.score.percentage,
        html_escape(grade.message())
    ));
    html.push_str(&score_bar(report.score.percentage, grade));
    html.push_str(&format!(
        "<p class=\"meta\">{} of {} correct</p>\n",
        report.score.correct, report.score.total
    ));
    html.push_str("</section>\n");

    // Questions
    html.push_str("<section class=\"questions\">\n");
    for (index, question) in report.quiz.questions.iter().enumerate() {
        let chosen = report.answers.get(index);
        let correct = report
            .score
            .per_question_correct
            .get(index)
            .copied()
            .unwrap_or(false);
        html.push_str(&question_card(index, question, chosen, correct));
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

fn question_card(index: usize, question: &Question, chosen: Option<&str>, correct: bool) -> String {
    let mut card = format!(
        "<article class=\"question {}\">\n",
        if correct { "correct" } else { "incorrect" }
    );
    card.push_str(&format!(
        "<h3>{}. {} <span class=\"mark\">{}</span></h3>\n",
        index + 1,
        html_escape(&question.prompt),
        if correct { "✓" } else { "✗" }
    ));
    if let Some(image) = &question.image {
        card.push_str(&format!(
            "<img class=\"question-image\" src=\"{}\" alt=\"\">\n",
            html_escape(image)
        ));
    }
    if chosen.is_none() {
        card.push_str("<p class=\"unanswered\">Not answered</p>\n");
    }

    card.push_str("<ul class=\"options\">\n");
    for option in &question.options {
        card.push_str(&option_item(option, question, chosen, correct));
    }
    card.push_str("</ul>\n</article>\n");
    card
}

fn option_item(
    option: &AnswerOption,
    question: &Question,
    chosen: Option<&str>,
    correct: bool,
) -> String {
    let is_answer = option.label == question.correct_label;
    let is_wrong_choice = !correct && chosen == Some(option.label.as_str());

    let (class, note) = if is_answer {
        ("answer", " ✓ Correct answer")
    } else if is_wrong_choice {
        ("wrong", " ✗ Your answer")
    } else {
        ("", "")
    };

    let mut item = format!("<li class=\"{class}\">");
    if let Some(image) = &option.image {
        item.push_str(&format!(
            "<img class=\"option-image\" src=\"{}\" alt=\"\"> ",
            html_escape(image)
        ));
    }
    if option.text.is_some() || option.image.is_none() {
        item.push_str(&html_escape(option.display_text()));
    }
    item.push_str(note);
    item.push_str("</li>\n");
    item
}

fn score_bar(percentage: u8, grade: Grade) -> String {
    let max_width = 400;
    let width = usize::from(percentage) * max_width / 100;
    let color = match grade {
        Grade::Passed => "#22c55e",
        Grade::Fair => "#eab308",
        Grade::Failed => "#ef4444",
    };

    format!(
        "<svg width=\"{max_width}\" height=\"24\" xmlns=\"http://www.w3.org/2000/svg\">\n  \
         <rect x=\"0\" y=\"0\" width=\"{max_width}\" height=\"24\" fill=\"#e5e7eb\" rx=\"4\"/>\n  \
         <rect x=\"0\" y=\"0\" width=\"{width}\" height=\"24\" fill=\"{color}\" rx=\"4\"/>\n\
         </svg>\n"
    )
}

/// Write the review page to a file.
pub fn write_html_report(report: &SessionReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write review page to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --warn: #fef9c3; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --warn: #713f12; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 56rem; padding: 2rem; background: var(--bg); color: var(--fg); }
.meta { color: #6b7280; }
.headline { padding: 1rem 1.5rem; border-radius: 8px; margin: 1.5rem 0; }
.headline.passed { background: var(--pass); }
.headline.fair { background: var(--warn); }
.headline.failed { background: var(--fail); }
.question { border: 2px solid var(--border); border-radius: 8px; padding: 1rem 1.5rem; margin: 1rem 0; }
.question.correct { border-color: #22c55e; }
.question.incorrect { border-color: #ef4444; }
.mark { float: right; }
.options { list-style: none; padding: 0; }
.options li { padding: 0.5rem; border-radius: 4px; margin: 0.25rem 0; }
.options li.answer { background: var(--pass); font-weight: bold; }
.options li.wrong { background: var(--fail); }
.unanswered { font-style: italic; color: #6b7280; }
img { max-width: 100%; }
.option-image { max-height: 6rem; vertical-align: middle; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::make_report;

    #[test]
    fn review_page_contains_required_elements() {
        let html = generate_html(&make_report());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("European &lt;capitals&gt;"));
        assert!(html.contains("Result: 50%"));
        assert!(html.contains("headline fair"));
        assert!(html.contains("student@school.edu"));
        assert!(html.contains("italy.png"));
    }

    #[test]
    fn correct_and_wrong_options_are_marked() {
        let html = generate_html(&make_report());

        assert!(html.contains("<li class=\"answer\">Paris ✓ Correct answer</li>"));
        assert!(html.contains("<li class=\"wrong\">Milan ✗ Your answer</li>"));
        assert!(html.contains("<li class=\"answer\">Rome ✓ Correct answer</li>"));
        assert!(html.contains("<li class=\"\">Lyon</li>"));
    }

    #[test]
    fn unanswered_question_is_flagged() {
        let mut report = make_report();
        report.answers = std::iter::once((0, "Paris".to_string())).collect();
        report.score.per_question_correct = vec![true, false];
        let html = generate_html(&report);
        assert!(html.contains("Not answered"));
        assert!(!html.contains("Your answer"));
    }

    #[test]
    fn write_review_page_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/review.html");

        write_html_report(&make_report(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
