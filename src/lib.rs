//! # docchat
//!
//! Retrieval-augmented question answering over a local set of PDF
//! documents. PDFs are reduced to text, chunked, embedded with a local
//! sentence-embedding model, and indexed in memory; questions are condensed
//! against the running conversation, matched against the index, and
//! answered by an OpenAI-compatible completion endpoint.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────┐   ┌─────────┐   ┌────────────┐   ┌─────────────┐
//! │  PDFs  │──▶│ Extract │──▶│ Chunk+Embed │──▶│ VectorIndex │
//! └────────┘   └─────────┘   └────────────┘   └──────┬──────┘
//!                                                    │ top-k
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌─────▼─────┐
//! │ question │──▶│ Condense │──▶│ Retrieve │──▶│ Generate  │──▶ answer
//! └──────────┘   └──────────┘   └──────────┘   └───────────┘
//!                      ▲                             │
//!                      └──────── conversation ◀──────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Environment-provided configuration |
//! | [`error`] | Pipeline error taxonomy |
//! | [`extract`] | PDF text extraction and directory loading |
//! | [`chunk`] | Overlapping newline-boundary chunker |
//! | [`embedding`] | Local sentence-embedding provider |
//! | [`index`] | In-memory cosine-similarity vector index |
//! | [`prompt`] | Condense/answer templates and history serialization |
//! | [`llm`] | OpenAI-compatible completion client |
//! | [`memory`] | Append-only conversation log |
//! | [`session`] | Per-session orchestrator |

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod index;
pub mod llm;
pub mod memory;
pub mod prompt;
pub mod session;
