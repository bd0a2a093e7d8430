//! quizrun-catalog: Where quizzes and actors come from.
//!
//! Implements the `QuizStore` trait over a local quiz directory, a remote
//! HTTP document store, and an in-memory mock, plus a TTL cache wrapper,
//! the `quizrun.toml` configuration, and the actor directory.

pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod mock;
pub mod store;
pub mod users;

pub use config::{create_store, load_config, load_config_from, QuizrunConfig, RemoteConfig};
pub use error::CatalogError;
pub use store::{list_visible, QuizStore};
pub use users::ActorDirectory;
