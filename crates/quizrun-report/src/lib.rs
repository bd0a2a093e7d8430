//! quizrun-report: Review pages for submitted sessions.
//!
//! Renders a [`SessionReport`](quizrun_core::report::SessionReport) as a
//! self-contained HTML page or as plain terminal text.

pub mod html;
pub mod text;
