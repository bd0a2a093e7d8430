//! Access resolver: decides whether an actor may start a quiz.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. no signed-in actor: denied, sign in required
//! 2. admin: allowed
//! 3. non-empty personal allow-list: allowed iff the quiz id is on it
//! 4. non-empty quiz allow-list: allowed iff the actor is on it
//! 5. otherwise allowed (open quiz)
//!
//! Rule 3 overrides rule 4; the two lists are never unioned.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::model::{Actor, Quiz, Role};

/// The rule that allowed access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRule {
    Admin,
    PersonalAllowList,
    QuizAllowList,
    OpenQuiz,
}

impl fmt::Display for AccessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessRule::Admin => write!(f, "admin"),
            AccessRule::PersonalAllowList => write!(f, "personal allow-list"),
            AccessRule::QuizAllowList => write!(f, "quiz allow-list"),
            AccessRule::OpenQuiz => write!(f, "open quiz"),
        }
    }
}

/// Proof that the resolver authorized an actor for one quiz.
///
/// Only [`resolve`] can construct a grant, and a session refuses to start
/// without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    quiz_id: String,
    actor: String,
    rule: AccessRule,
}

impl AccessGrant {
    pub fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn rule(&self) -> AccessRule {
        self.rule
    }
}

/// Decide whether `actor` may start `quiz`.
///
/// # Errors
///
/// Returns the [`AccessError`] of the rule that denied access.
pub fn resolve(actor: Option<&Actor>, quiz: &Quiz) -> Result<AccessGrant, AccessError> {
    let Some(actor) = actor else {
        tracing::debug!(quiz = %quiz.id, "access denied: no signed-in actor");
        return Err(AccessError::Unauthenticated);
    };

    let rule = match_rule(actor, quiz)?;
    tracing::debug!(quiz = %quiz.id, actor = %actor.email, %rule, "access granted");

    Ok(AccessGrant {
        quiz_id: quiz.id.clone(),
        actor: actor.email.clone(),
        rule,
    })
}

fn match_rule(actor: &Actor, quiz: &Quiz) -> Result<AccessRule, AccessError> {
    if actor.role == Role::Admin {
        return Ok(AccessRule::Admin);
    }

    if !actor.allowed_tests.is_empty() {
        return if actor.allowed_tests.iter().any(|id| *id == quiz.id) {
            Ok(AccessRule::PersonalAllowList)
        } else {
            tracing::debug!(quiz = %quiz.id, actor = %actor.email, "not in personal allow-list");
            Err(AccessError::NotInPersonalAllowList {
                actor: actor.email.clone(),
                quiz_id: quiz.id.clone(),
            })
        };
    }

    if !quiz.allowed_users.is_empty() {
        return if quiz.allowed_users.iter().any(|u| *u == actor.email) {
            Ok(AccessRule::QuizAllowList)
        } else {
            tracing::debug!(quiz = %quiz.id, actor = %actor.email, "not in quiz allow-list");
            Err(AccessError::NotInQuizAllowList {
                actor: actor.email.clone(),
                quiz_id: quiz.id.clone(),
            })
        };
    }

    Ok(AccessRule::OpenQuiz)
}

/// Quizzes from `quizzes` that `actor` may start, in their original order.
pub fn visible_quizzes<'a>(actor: Option<&Actor>, quizzes: &'a [Quiz]) -> Vec<&'a Quiz> {
    quizzes
        .iter()
        .filter(|q| resolve(actor, q).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::quiz_with_answers;

    fn quiz(id: &str, allowed: &[&str]) -> Quiz {
        let mut quiz = quiz_with_answers(id, 60, &["a"]);
        quiz.allowed_users = allowed.iter().map(|s| s.to_string()).collect();
        quiz
    }

    #[test]
    fn anonymous_is_denied_with_login_hint() {
        let err = resolve(None, &quiz("q", &[])).unwrap_err();
        assert_eq!(err, AccessError::Unauthenticated);
        assert!(err.requires_login());
    }

    #[test]
    fn admin_bypasses_every_list() {
        let actor = Actor::admin("root@x").with_allowed_tests(["other"]);
        let grant = resolve(Some(&actor), &quiz("q", &["someone@x"])).unwrap();
        assert_eq!(grant.rule(), AccessRule::Admin);
        assert_eq!(grant.quiz_id(), "q");
        assert_eq!(grant.actor(), "root@x");
    }

    #[test]
    fn personal_list_overrides_quiz_list() {
        let actor = Actor::student("actor@x").with_allowed_tests(["quizA"]);
        let quiz_b = quiz("quizB", &["actor@x"]);
        let err = resolve(Some(&actor), &quiz_b).unwrap_err();
        assert!(matches!(err, AccessError::NotInPersonalAllowList { .. }));

        let quiz_a = quiz("quizA", &["someone-else@x"]);
        let grant = resolve(Some(&actor), &quiz_a).unwrap();
        assert_eq!(grant.rule(), AccessRule::PersonalAllowList);
    }

    #[test]
    fn quiz_list_applies_without_personal_list() {
        let allowed = Actor::student("actor@x");
        let other = Actor::student("other@x");
        let q = quiz("q", &["actor@x"]);
        assert_eq!(
            resolve(Some(&allowed), &q).unwrap().rule(),
            AccessRule::QuizAllowList
        );
        assert!(matches!(
            resolve(Some(&other), &q),
            Err(AccessError::NotInQuizAllowList { .. })
        ));
    }

    #[test]
    fn open_quiz_allows_any_student() {
        let actor = Actor::student("anyone@x");
        assert_eq!(
            resolve(Some(&actor), &quiz("q", &[])).unwrap().rule(),
            AccessRule::OpenQuiz
        );
    }

    #[test]
    fn visible_quizzes_matches_resolver() {
        let quizzes = vec![quiz("open", &[]), quiz("closed", &["x@x"]), quiz("mine", &["me@x"])];
        let me = Actor::student("me@x");
        let ids: Vec<_> = visible_quizzes(Some(&me), &quizzes)
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(ids, vec!["open", "mine"]);
        assert!(visible_quizzes(None, &quizzes).is_empty());
    }
}
