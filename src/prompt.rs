//! Prompt templates and history serialization.
//!
//! Everything here is pure string formatting: the condense template wording
//! is part of the retrieval contract (the model was prompted this way when
//! the pipeline was tuned), and the history serializer is a standalone
//! function so it can be tested without any model call.

use crate::index::Hit;
use crate::memory::ConversationTurn;

/// Instruction template that turns a follow-up question plus chat history
/// into a standalone question. Wording is fixed; `{chat_history}` and
/// `{question}` are substituted verbatim.
const CONDENSE_TEMPLATE: &str = "Given the following conversation and a follow up question, rephrase the follow up question to be a standalone question, in its original language.
Chat History:
{chat_history}
Follow Up Input: {question}
Standalone question:";

/// Serialize conversation turns for prompt embedding.
///
/// Each turn becomes a `Human:` line followed by an `Assistant:` line.
/// Empty history serializes to the empty string; the template is still
/// rendered and sent (the first-turn round-trip is part of the contract).
pub fn format_history(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|t| format!("Human: {}\nAssistant: {}", t.question, t.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the condense prompt for a follow-up question.
pub fn condense_prompt(turns: &[ConversationTurn], question: &str) -> String {
    CONDENSE_TEMPLATE
        .replace("{chat_history}", &format_history(turns))
        .replace("{question}", question)
}

/// Render the generation prompt: retrieved chunks as context, then the
/// standalone question.
pub fn answer_prompt(context: &[Hit], question: &str) -> String {
    let context_text = context
        .iter()
        .map(|h| h.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Use the following pieces of context to answer the question at the end.\n\
         \n\
         {}\n\
         \n\
         Question: {}\n\
         Helpful Answer:",
        context_text, question
    )
}
