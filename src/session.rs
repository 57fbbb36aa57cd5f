//! Conversational retrieval session.
//!
//! [`ChatSession`] is the session-scoped context object the shell owns: one
//! optional vector index and one conversation memory, plus the providers
//! that serve them. There are no process-wide singletons; everything a turn
//! needs travels through the session.
//!
//! Operations take `&mut self`, so one session never has two in-flight
//! operations and an index rebuild can never race a question.

use std::sync::Arc;

use crate::chunk::split_text;
use crate::config::Config;
use crate::embedding::Embedder;
use crate::error::PipelineError;
use crate::extract::extract_documents;
use crate::index::VectorIndex;
use crate::llm::CompletionModel;
use crate::memory::{ConversationMemory, ConversationTurn};
use crate::prompt::{answer_prompt, condense_prompt};

/// Per-session pipeline knobs, fixed at session creation.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub chunk_size: usize,
    pub overlap: usize,
    pub top_k: usize,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_size: config.chunking.chunk_size,
            overlap: config.chunking.overlap,
            top_k: config.retrieval.top_k,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
            top_k: 4,
        }
    }
}

/// One user's in-memory question-answering session.
pub struct ChatSession {
    embedder: Arc<dyn Embedder>,
    model: Arc<dyn CompletionModel>,
    options: SessionOptions,
    index: Option<Arc<VectorIndex>>,
    memory: ConversationMemory,
}

impl ChatSession {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        model: Arc<dyn CompletionModel>,
        options: SessionOptions,
    ) -> Self {
        Self {
            embedder,
            model,
            options,
            index: None,
            memory: ConversationMemory::new(),
        }
    }

    /// Rebuild the index from raw PDF byte streams: extract, chunk, embed,
    /// and swap. All-or-nothing: any failure leaves the previous index
    /// intact and queryable. Returns the number of indexed chunks.
    pub async fn rebuild_index(&mut self, documents: &[Vec<u8>]) -> Result<usize, PipelineError> {
        let text = extract_documents(documents)?;
        self.rebuild_index_from_text(&text).await
    }

    /// Rebuild the index from already-extracted text.
    ///
    /// An empty document set is not a build: no index is installed, any
    /// previous index is kept, and questions against a fresh session keep
    /// failing with [`PipelineError::IndexNotReady`] rather than being
    /// answered from zero retrieved context.
    pub async fn rebuild_index_from_text(&mut self, text: &str) -> Result<usize, PipelineError> {
        let chunks = split_text(text, self.options.chunk_size, self.options.overlap);
        if chunks.is_empty() {
            tracing::warn!("no text to index; keeping existing index");
            return Ok(0);
        }
        tracing::info!(chunks = chunks.len(), "building vector index");

        // Build fully before touching the session: queries must never see
        // a partially built index.
        let index = VectorIndex::build(self.embedder.as_ref(), chunks).await?;
        let count = index.len();
        self.index = Some(Arc::new(index));
        Ok(count)
    }

    /// Answer one question against the indexed documents.
    ///
    /// Condenses the question against the running history, retrieves the
    /// top-k chunks for the standalone question, generates the answer, and
    /// only then commits the turn. A failure anywhere leaves the memory
    /// exactly as it was.
    pub async fn ask(&mut self, question: &str) -> Result<String, PipelineError> {
        let index = match &self.index {
            Some(index) => Arc::clone(index),
            None => return Err(PipelineError::IndexNotReady),
        };

        // Condense: always a model round-trip, even on the first turn with
        // empty history; the history formatting is part of the prompt
        // contract.
        let standalone = self
            .model
            .complete(&condense_prompt(self.memory.turns(), question))
            .await?;
        let standalone = if standalone.trim().is_empty() {
            question.to_string()
        } else {
            standalone
        };
        tracing::debug!(%standalone, "condensed question");

        // Retrieve.
        let hits = index
            .query(self.embedder.as_ref(), &standalone, self.options.top_k)
            .await?;
        tracing::debug!(hits = hits.len(), "retrieved context");

        // Generate.
        let answer = self
            .model
            .complete(&answer_prompt(&hits, &standalone))
            .await?;

        // Commit only after the full answer exists.
        self.memory.push(question.to_string(), answer.clone());
        Ok(answer)
    }

    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// All committed turns, oldest first.
    pub fn history(&self) -> &[ConversationTurn] {
        self.memory.turns()
    }

    /// Flat alternating question/answer entries for display.
    pub fn transcript(&self) -> Vec<&str> {
        self.memory.flat_entries()
    }

    /// Session reset: drop the index and the conversation.
    pub fn reset(&mut self) {
        self.index = None;
        self.memory.clear();
    }
}
