//! Local sentence-embedding provider.
//!
//! Defines the [`Embedder`] trait and the fastembed-backed [`LocalEmbedder`].
//! Embeddings run entirely on local compute; the model is downloaded once
//! from Hugging Face and cached, after which no network calls are made.
//! There is no retry path: an embedding failure is resource exhaustion or a
//! broken model cache, and either is fatal to the operation.

use async_trait::async_trait;

use crate::error::PipelineError;

/// A text-to-vector provider. Same text and model always produce the same
/// vector, and a batch of N texts yields N vectors in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, in order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError>;

    /// Model identifier (e.g. `"all-minilm-l6-v2"`).
    fn model_name(&self) -> &str;

    /// Embedding dimensionality (e.g. `384`).
    fn dims(&self) -> usize;
}

/// Embed a single query text.
///
/// Convenience wrapper around [`Embedder::embed`] for the retrieval path.
pub async fn embed_query(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>, PipelineError> {
    let mut vectors = embedder.embed(&[text.to_string()]).await?;
    if vectors.is_empty() {
        return Err(PipelineError::EmbeddingResource(
            "empty embedding batch for query".to_string(),
        ));
    }
    Ok(vectors.swap_remove(0))
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`; `0.0` for empty vectors or vectors of
/// different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}

// ============ Local Provider (fastembed) ============

/// Embedding provider running a pre-trained sentence-embedding model on
/// local CPU via fastembed.
///
/// The default model is `all-minilm-l6-v2` (384 dims), the same sentence
/// transformer family the retrieval quality was tuned against.
#[cfg(feature = "local-embeddings")]
pub struct LocalEmbedder {
    model_name: String,
    dims: usize,
    batch_size: usize,
}

#[cfg(feature = "local-embeddings")]
impl LocalEmbedder {
    pub fn new(model_name: &str) -> Result<Self, PipelineError> {
        // Fail on unknown names up front rather than at first embed call.
        model_to_fastembed(model_name)?;
        Ok(Self {
            model_name: model_name.to_string(),
            dims: model_dims(model_name),
            batch_size: 64,
        })
    }
}

#[cfg(feature = "local-embeddings")]
#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
        let model = model_to_fastembed(&self.model_name)?;
        let batch_size = self.batch_size;
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut embedder = fastembed::TextEmbedding::try_new(
                fastembed::InitOptions::new(model).with_show_download_progress(false),
            )
            .map_err(|e| {
                PipelineError::EmbeddingResource(format!("model init failed: {}", e))
            })?;

            embedder
                .embed(texts, Some(batch_size))
                .map_err(|e| PipelineError::EmbeddingResource(e.to_string()))
        })
        .await
        .map_err(|e| PipelineError::EmbeddingResource(format!("embedding task failed: {}", e)))?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dims(&self) -> usize {
        self.dims
    }
}

#[cfg(feature = "local-embeddings")]
fn model_to_fastembed(name: &str) -> Result<fastembed::EmbeddingModel, PipelineError> {
    match name {
        "all-minilm-l6-v2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
        "bge-small-en-v1.5" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(fastembed::EmbeddingModel::BGEBaseENV15),
        "multilingual-e5-small" => Ok(fastembed::EmbeddingModel::MultilingualE5Small),
        other => Err(PipelineError::EmbeddingResource(format!(
            "unknown local embedding model '{}'; supported: all-minilm-l6-v2, \
             bge-small-en-v1.5, bge-base-en-v1.5, multilingual-e5-small",
            other
        ))),
    }
}

#[cfg(feature = "local-embeddings")]
fn model_dims(name: &str) -> usize {
    match name {
        "bge-base-en-v1.5" => 768,
        // all-minilm-l6-v2, bge-small-en-v1.5, multilingual-e5-small
        _ => 384,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_empty_or_mismatched_is_zero() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[cfg(feature = "local-embeddings")]
    #[test]
    fn unknown_local_model_is_rejected_at_construction() {
        assert!(LocalEmbedder::new("word2vec").is_err());
        assert!(LocalEmbedder::new("all-minilm-l6-v2").is_ok());
    }

    #[cfg(feature = "local-embeddings")]
    #[test]
    fn known_model_dims() {
        let e = LocalEmbedder::new("all-minilm-l6-v2").unwrap();
        assert_eq!(e.dims(), 384);
        assert_eq!(e.model_name(), "all-minilm-l6-v2");
    }
}
