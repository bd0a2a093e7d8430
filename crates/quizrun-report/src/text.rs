//! Plain-text review for terminals.

use std::fmt::Write;

use quizrun_core::report::SessionReport;
use quizrun_core::timer::format_clock;

/// Render a report as plain text: headline, then one block per question.
pub fn render_text(report: &SessionReport) -> String {
    let mut out = String::new();
    let grade = report.grade();

    let _ = writeln!(out, "{}", report.quiz.display_title());
    let _ = writeln!(
        out,
        "Result: {}% ({}/{} correct, {})",
        report.score.percentage, report.score.correct, report.score.total, grade
    );
    let _ = writeln!(out, "{}", grade.message());
    let _ = writeln!(
        out,
        "Submitted by {} ({}), time used {}",
        report.actor,
        report.cause,
        format_clock(report.elapsed_secs)
    );

    for (index, question) in report.quiz.questions.iter().enumerate() {
        let chosen = report.answers.get(index);
        let correct = report
            .score
            .per_question_correct
            .get(index)
            .copied()
            .unwrap_or(false);

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} {}. {}",
            if correct { "✓" } else { "✗" },
            index + 1,
            question.prompt
        );
        for option in &question.options {
            let marker = if option.label == question.correct_label {
                "  <- correct"
            } else if !correct && chosen == Some(option.label.as_str()) {
                "  <- your answer"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "    [{}] {}{}",
                option.label,
                option.display_text(),
                marker
            );
        }
        if chosen.is_none() {
            let _ = writeln!(out, "    (not answered)");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::make_report;

    #[test]
    fn text_review_marks_answers() {
        let text = render_text(&make_report());
        assert!(text.starts_with("European <capitals>\n"));
        assert!(text.contains("Result: 50% (1/2 correct, fair)"));
        assert!(text.contains("✓ 1. Capital of France?"));
        assert!(text.contains("✗ 2. Capital of Italy?"));
        assert!(text.contains("[a] Milan  <- your answer"));
        assert!(text.contains("[b] Rome  <- correct"));
        assert!(!text.contains("(not answered)"));
    }
}
