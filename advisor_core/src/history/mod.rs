//! Conversation history - the exchanges of one engine instance.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeId(pub Uuid);

impl ExchangeId {
    /// Create a new random exchange ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user utterance and the reply it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: ExchangeId,
    pub user: String,
    pub reply: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            id: ExchangeId::new(),
            user: user.into(),
            reply: reply.into(),
        }
    }
}

/// Append-only, chronological record of completed exchanges.
///
/// Only exchanges that received a reply are recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationHistory {
    exchanges: Vec<Exchange>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed exchange.
    pub fn push(&mut self, user: impl Into<String>, reply: impl Into<String>) -> ExchangeId {
        let exchange = Exchange::new(user, reply);
        let id = exchange.id;
        self.exchanges.push(exchange);
        id
    }

    /// The last `window` exchanges, oldest first.
    pub fn recent(&self, window: usize) -> &[Exchange] {
        let start = self.exchanges.len().saturating_sub(window);
        &self.exchanges[start..]
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    pub fn last(&self) -> Option<&Exchange> {
        self.exchanges.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(n: usize) -> ConversationHistory {
        let mut history = ConversationHistory::new();
        for i in 1..=n {
            history.push(format!("q{}", i), format!("a{}", i));
        }
        history
    }

    #[test]
    fn test_push_assigns_unique_ids() {
        let mut history = ConversationHistory::new();
        let a = history.push("hello", "hi");
        let b = history.push("hello", "hi");
        assert_ne!(a, b);
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().id, b);
    }

    #[test]
    fn test_recent_keeps_newest_in_order() {
        let history = history_of(5);
        let recent: Vec<_> = history.recent(3).iter().map(|e| e.user.as_str()).collect();
        assert_eq!(recent, vec!["q3", "q4", "q5"]);
        // Trimming is a view; storage is untouched.
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn test_recent_shorter_than_window() {
        let history = history_of(2);
        assert_eq!(history.recent(3).len(), 2);
        assert_eq!(history.recent(3)[0].reply, "a1");
    }

    #[test]
    fn test_recent_edge_windows() {
        let history = history_of(4);
        assert!(history.recent(0).is_empty());
        assert_eq!(history.recent(10).len(), 4);
        assert!(ConversationHistory::new().recent(3).is_empty());
    }
}
