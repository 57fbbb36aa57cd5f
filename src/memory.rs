//! Conversation memory.
//!
//! An ordered, append-only log of question/answer turns. Turns are only
//! committed after a fully successful generation, so the log never holds a
//! question without its answer. Cleared only on session reset.

/// One completed question/answer exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
}

/// Ordered sequence of all turns so far. Never reordered or deduplicated.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: Vec<ConversationTurn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, question: String, answer: String) {
        self.turns.push(ConversationTurn { question, answer });
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Flat alternating question/answer strings, oldest first, for display.
    pub fn flat_entries(&self) -> Vec<&str> {
        self.turns
            .iter()
            .flat_map(|t| [t.question.as_str(), t.answer.as_str()])
            .collect()
    }

    /// Session reset: drop all turns.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
