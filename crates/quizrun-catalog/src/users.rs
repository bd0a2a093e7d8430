//! Actor directory: who is signed in, and with what role.

use std::collections::HashMap;

use quizrun_core::model::Actor;

use crate::config::QuizrunConfig;

/// Known actors keyed by email.
#[derive(Debug, Clone, Default)]
pub struct ActorDirectory {
    actors: HashMap<String, Actor>,
}

impl ActorDirectory {
    pub fn from_config(config: &QuizrunConfig) -> Self {
        config
            .users
            .iter()
            .map(|(email, entry)| Actor {
                email: email.clone(),
                role: entry.role,
                allowed_tests: entry.allowed_tests.clone(),
            })
            .collect()
    }

    /// The actor signed in as `email`, or `None` when nobody by that email
    /// is known. An unknown email is treated as not signed in.
    pub fn lookup(&self, email: &str) -> Option<&Actor> {
        let actor = self.actors.get(email.trim());
        if actor.is_none() {
            tracing::debug!(email, "unknown actor");
        }
        actor
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

impl FromIterator<Actor> for ActorDirectory {
    fn from_iter<I: IntoIterator<Item = Actor>>(iter: I) -> Self {
        Self {
            actors: iter
                .into_iter()
                .map(|actor| (actor.email.clone(), actor))
                .collect(),
        }
    }
}
