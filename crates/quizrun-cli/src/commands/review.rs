//! The `quizrun review` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizrun_core::report::SessionReport;
use quizrun_report::html::generate_html;
use quizrun_report::text::render_text;

pub fn execute(report_path: PathBuf, format: String, output: Option<PathBuf>) -> Result<()> {
    let report = SessionReport::load_json(&report_path)?;

    let rendered = match format.as_str() {
        "text" => render_text(&report),
        "markdown" | "md" => report.to_markdown(),
        "html" => generate_html(&report),
        "json" => serde_json::to_string_pretty(&report)?,
        other => anyhow::bail!("unknown format: {other} (expected text, markdown, html or json)"),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
