//! quizrun-core: Timed quiz session engine, scoring, and access rules.
//!
//! This crate defines the quiz data model, the session state machine with
//! its countdown, the scoring engine, and the access resolver that gates
//! session start. Everything else in quizrun builds on these types.

pub mod access;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod timer;
