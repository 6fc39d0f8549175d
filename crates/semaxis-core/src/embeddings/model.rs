//! Embedding Model Capability Surface
//!
//! The engine never trains or mutates a model. It only needs to look vectors
//! up by entity key or by vocabulary word, and to ask for the words nearest a
//! query vector.

use crate::error::Result;

/// A read-only source of fixed-length embedding vectors
///
/// Implementations must return vectors of exactly [`EmbeddingModel::dimensions`]
/// components from every lookup.
pub trait EmbeddingModel: Send + Sync {
    /// Model identifier used in logs and reports
    fn id(&self) -> &str;

    /// Embedding dimension D, constant for the model instance
    fn dimensions(&self) -> usize;

    /// Look up a document/entity vector (speaker-year tags, doc ids, ...)
    fn embedding_by_key(&self, key: &str) -> Result<&[f32]>;

    /// Look up a vocabulary word vector
    fn embedding_by_word(&self, word: &str) -> Result<&[f32]>;

    /// The `top_n` vocabulary words most cosine-similar to `query`,
    /// ordered by descending similarity
    fn nearest_neighbors(&self, query: &[f32], top_n: usize) -> Result<Vec<(String, f32)>>;

    /// Whether an entity key resolves
    fn contains_key(&self, key: &str) -> bool {
        self.embedding_by_key(key).is_ok()
    }

    /// Whether a vocabulary word resolves
    fn contains_word(&self, word: &str) -> bool {
        self.embedding_by_word(word).is_ok()
    }
}

impl<M: EmbeddingModel + ?Sized> EmbeddingModel for &M {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn embedding_by_key(&self, key: &str) -> Result<&[f32]> {
        (**self).embedding_by_key(key)
    }

    fn embedding_by_word(&self, word: &str) -> Result<&[f32]> {
        (**self).embedding_by_word(word)
    }

    fn nearest_neighbors(&self, query: &[f32], top_n: usize) -> Result<Vec<(String, f32)>> {
        (**self).nearest_neighbors(query, top_n)
    }
}

impl<M: EmbeddingModel + ?Sized> EmbeddingModel for std::sync::Arc<M> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn embedding_by_key(&self, key: &str) -> Result<&[f32]> {
        (**self).embedding_by_key(key)
    }

    fn embedding_by_word(&self, word: &str) -> Result<&[f32]> {
        (**self).embedding_by_word(word)
    }

    fn nearest_neighbors(&self, query: &[f32], top_n: usize) -> Result<Vec<(String, f32)>> {
        (**self).nearest_neighbors(query, top_n)
    }
}
