//! Answer ledger: question index to chosen option label.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The answers collected during one session.
///
/// Only the session can write to a ledger; once the session is submitted
/// the ledger moves into the submission and is read-only from then on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerLedger {
    entries: BTreeMap<usize, String>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the answer for a question. Re-answering overwrites.
    pub(crate) fn record(&mut self, index: usize, label: impl Into<String>) -> Option<String> {
        self.entries.insert(index, label.into())
    }

    /// The label chosen for a question, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(&index).map(String::as_str)
    }

    /// Number of answered questions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if every index in `0..question_count` has an answer.
    pub fn covers(&self, question_count: usize) -> bool {
        (0..question_count).all(|i| self.entries.contains_key(&i))
    }

    /// Answers in question order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(|(i, l)| (*i, l.as_str()))
    }
}

impl FromIterator<(usize, String)> for AnswerLedger {
    fn from_iter<T: IntoIterator<Item = (usize, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reanswer_overwrites() {
        let mut ledger = AnswerLedger::new();
        assert_eq!(ledger.record(0, "a"), None);
        assert_eq!(ledger.record(0, "b"), Some("a".to_string()));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(0), Some("b"));
    }

    #[test]
    fn covers_requires_every_index() {
        let ledger: AnswerLedger = [(0, "a".to_string()), (2, "c".to_string())]
            .into_iter()
            .collect();
        assert!(!ledger.covers(3));
        assert!(ledger.covers(1));
        assert_eq!(
            ledger.iter().collect::<Vec<_>>(),
            vec![(0, "a"), (2, "c")]
        );
    }

    #[test]
    fn serializes_as_plain_map() {
        let ledger: AnswerLedger = [(1, "b".to_string())].into_iter().collect();
        assert_eq!(serde_json::to_string(&ledger).unwrap(), r#"{"1":"b"}"#);
    }
}
