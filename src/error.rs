//! Pipeline error taxonomy.
//!
//! Every fallible stage of the pipeline maps onto one of these variants so
//! the shell can decide what to show the user: an unreadable PDF aborts the
//! whole build, a missing index is a warning rather than a crash, and a
//! failed remote call aborts only the current turn.

/// Error produced by the document-chat pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// A byte stream handed to the extractor was not a readable PDF.
    /// Aborts the whole build batch.
    DocumentFormat(String),
    /// A query arrived before any successful index build. The shell turns
    /// this into a user-facing warning, never a crash.
    IndexNotReady,
    /// Local embedding computation failed (model init or inference).
    /// Fatal to the operation; never retried.
    EmbeddingResource(String),
    /// The remote language model call failed (network, auth, quota, or a
    /// malformed response). Fatal to the current turn only.
    RemoteModel(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::DocumentFormat(e) => write!(f, "PDF extraction failed: {}", e),
            PipelineError::IndexNotReady => {
                write!(f, "no document index built yet")
            }
            PipelineError::EmbeddingResource(e) => write!(f, "embedding failed: {}", e),
            PipelineError::RemoteModel(e) => write!(f, "model request failed: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_stage() {
        let e = PipelineError::DocumentFormat("bad xref".into());
        assert!(e.to_string().contains("PDF extraction failed"));
        assert!(PipelineError::IndexNotReady.to_string().contains("index"));
    }
}
