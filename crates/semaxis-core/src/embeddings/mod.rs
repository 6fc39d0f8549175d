//! Embedding Models Module
//!
//! Read-only access to trained embedding spaces:
//! - The `EmbeddingModel` capability trait (key lookup, word lookup, neighbours)
//! - An in-memory implementation with exact cosine neighbour search
//! - A word2vec text-format loader for externally trained models
//! - Cosine similarity and the other vector helpers the engine relies on

mod loader;
mod memory;
mod model;
mod vector;

pub use loader::{load_word2vec_text, parse_word2vec_text, LoadError, VectorFile};
pub use memory::InMemoryModel;
pub use model::EmbeddingModel;
pub use vector::{cosine_similarity, dot_product, l2_norm, mean_vector, normalized};
