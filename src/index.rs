//! In-memory vector index over chunk embeddings.
//!
//! Brute-force cosine similarity over all stored vectors; at the document
//! volumes this pipeline serves (one user's PDF set) a scan beats any
//! approximate structure. A built index is immutable; rebuilding produces a
//! fresh value that the session swaps in wholesale, so queries observe
//! either the old index or the new one in its entirety.

use uuid::Uuid;

use crate::embedding::{cosine_similarity, embed_query, Embedder};
use crate::error::PipelineError;

/// One retrievable unit of source text. Immutable once the index is built.
#[derive(Debug, Clone)]
pub struct TextChunk {
    pub id: Uuid,
    /// Position of this chunk in the original chunk sequence; the
    /// similarity tie-breaker.
    pub index: usize,
    pub text: String,
}

/// A retrieval hit: the chunk plus its similarity to the query.
#[derive(Debug, Clone)]
pub struct Hit {
    pub chunk: TextChunk,
    pub score: f32,
}

/// The full set of (chunk, embedding) pairs for one document set.
pub struct VectorIndex {
    chunks: Vec<TextChunk>,
    vectors: Vec<Vec<f32>>,
    model: String,
}

impl VectorIndex {
    /// Embed `texts` and build a searchable index over them.
    ///
    /// All-or-nothing: an embedding failure yields no index, so the caller
    /// keeps whatever index it had before.
    pub async fn build(
        embedder: &dyn Embedder,
        texts: Vec<String>,
    ) -> Result<VectorIndex, PipelineError> {
        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed(&texts).await?
        };

        if vectors.len() != texts.len() {
            return Err(PipelineError::EmbeddingResource(format!(
                "expected {} vectors, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        let chunks = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| TextChunk {
                id: Uuid::new_v4(),
                index,
                text,
            })
            .collect::<Vec<_>>();

        tracing::debug!(chunks = chunks.len(), model = embedder.model_name(), "index built");

        Ok(VectorIndex {
            chunks,
            vectors,
            model: embedder.model_name().to_string(),
        })
    }

    /// Embed `text` with the same provider used at build time and return
    /// the `k` most similar chunks, ordered by decreasing similarity.
    /// Ties are broken by original chunk order.
    pub async fn query(
        &self,
        embedder: &dyn Embedder,
        text: &str,
        k: usize,
    ) -> Result<Vec<Hit>, PipelineError> {
        let query_vec = embed_query(embedder, text).await?;

        let mut hits: Vec<Hit> = self
            .chunks
            .iter()
            .zip(self.vectors.iter())
            .map(|(chunk, vector)| Hit {
                chunk: chunk.clone(),
                score: cosine_similarity(&query_vec, vector),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.chunk.index.cmp(&b.chunk.index))
        });
        hits.truncate(k);
        Ok(hits)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Model the chunk vectors were produced with; queries must use it too.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic test embedder: a fixed two-dimensional vector per
    /// known phrase, orthogonal across topics.
    struct PlantedEmbedder;

    #[async_trait]
    impl Embedder for PlantedEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
            Ok(texts
                .iter()
                .map(|t| match t.as_str() {
                    "alpha" => vec![1.0, 0.0],
                    "beta" => vec![0.9, 0.1],
                    "gamma" => vec![0.0, 1.0],
                    _ => vec![0.5, 0.5],
                })
                .collect())
        }

        fn model_name(&self) -> &str {
            "planted"
        }

        fn dims(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn query_orders_by_similarity() {
        let embedder = PlantedEmbedder;
        let index = VectorIndex::build(
            &embedder,
            vec!["gamma".into(), "beta".into(), "alpha".into()],
        )
        .await
        .unwrap();

        // Query vector equals "alpha"'s: alpha first, beta second.
        let hits = index.query(&embedder, "alpha", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.text, "alpha");
        assert_eq!(hits[1].chunk.text, "beta");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn ties_break_by_chunk_order() {
        let embedder = PlantedEmbedder;
        // Two identical texts embed identically; the earlier chunk wins.
        let index = VectorIndex::build(&embedder, vec!["alpha".into(), "alpha".into()])
            .await
            .unwrap();
        let hits = index.query(&embedder, "alpha", 2).await.unwrap();
        assert_eq!(hits[0].chunk.index, 0);
        assert_eq!(hits[1].chunk.index, 1);
    }

    #[tokio::test]
    async fn k_larger_than_index_returns_everything() {
        let embedder = PlantedEmbedder;
        let index = VectorIndex::build(&embedder, vec!["alpha".into()])
            .await
            .unwrap();
        let hits = index.query(&embedder, "alpha", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn empty_build_yields_empty_index() {
        let embedder = PlantedEmbedder;
        let index = VectorIndex::build(&embedder, Vec::new()).await.unwrap();
        assert!(index.is_empty());
        assert!(index.query(&embedder, "alpha", 3).await.unwrap().is_empty());
    }
}
