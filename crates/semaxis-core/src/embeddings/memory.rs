//! In-Memory Embedding Model
//!
//! Holds a vocabulary table and an entity-key table in insertion order.
//! Nearest-neighbour queries are an exhaustive cosine scan, which is exact
//! and fast enough for the vocabulary sizes doc2vec studies produce.

use std::collections::HashMap;

use super::model::EmbeddingModel;
use super::vector::{dot_product, normalized};
use crate::error::{KeySpace, ProjectionError, Result};

// ============================================================================
// VECTOR TABLE
// ============================================================================

#[derive(Debug, Clone, Default)]
struct VectorTable {
    index: HashMap<String, usize>,
    labels: Vec<String>,
    vectors: Vec<Vec<f32>>,
    /// Unit-length copies used for neighbour search; `None` for zero vectors
    units: Vec<Option<Vec<f32>>>,
}

impl VectorTable {
    fn insert(&mut self, label: String, vector: Vec<f32>) {
        let unit = normalized(&vector);
        if let Some(&slot) = self.index.get(&label) {
            self.vectors[slot] = vector;
            self.units[slot] = unit;
            return;
        }
        self.index.insert(label.clone(), self.labels.len());
        self.labels.push(label);
        self.vectors.push(vector);
        self.units.push(unit);
    }

    fn get(&self, label: &str) -> Option<&[f32]> {
        self.index.get(label).map(|&i| self.vectors[i].as_slice())
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

// ============================================================================
// MODEL
// ============================================================================

/// An embedding model fully resident in memory
#[derive(Debug, Clone)]
pub struct InMemoryModel {
    id: String,
    dimensions: usize,
    words: VectorTable,
    keys: VectorTable,
}

impl InMemoryModel {
    /// Create an empty model of the given dimension
    pub fn new(id: impl Into<String>, dimensions: usize) -> Self {
        Self {
            id: id.into(),
            dimensions,
            words: VectorTable::default(),
            keys: VectorTable::default(),
        }
    }

    fn check_dimensions(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(ProjectionError::DimensionMismatch {
                expected: self.dimensions,
                got: vector.len(),
            });
        }
        Ok(())
    }

    /// Add or replace a vocabulary word vector
    pub fn insert_word(&mut self, word: impl Into<String>, vector: Vec<f32>) -> Result<()> {
        self.check_dimensions(&vector)?;
        self.words.insert(word.into(), vector);
        Ok(())
    }

    /// Add or replace an entity-key vector
    pub fn insert_key(&mut self, key: impl Into<String>, vector: Vec<f32>) -> Result<()> {
        self.check_dimensions(&vector)?;
        self.keys.insert(key.into(), vector);
        Ok(())
    }

    /// Builder-style [`InMemoryModel::insert_word`]
    pub fn with_word(mut self, word: impl Into<String>, vector: Vec<f32>) -> Result<Self> {
        self.insert_word(word, vector)?;
        Ok(self)
    }

    /// Builder-style [`InMemoryModel::insert_key`]
    pub fn with_key(mut self, key: impl Into<String>, vector: Vec<f32>) -> Result<Self> {
        self.insert_key(key, vector)?;
        Ok(self)
    }

    /// Number of vocabulary words
    pub fn vocabulary_len(&self) -> usize {
        self.words.len()
    }

    /// Number of entity keys
    pub fn key_len(&self) -> usize {
        self.keys.len()
    }

    /// Vocabulary words in insertion order
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.words.labels.iter().map(String::as_str)
    }

    /// Entity keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.labels.iter().map(String::as_str)
    }
}

impl EmbeddingModel for InMemoryModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embedding_by_key(&self, key: &str) -> Result<&[f32]> {
        self.keys
            .get(key)
            .ok_or_else(|| ProjectionError::missing_key(key, KeySpace::Entity))
    }

    fn embedding_by_word(&self, word: &str) -> Result<&[f32]> {
        self.words
            .get(word)
            .ok_or_else(|| ProjectionError::missing_key(word, KeySpace::Vocabulary))
    }

    fn nearest_neighbors(&self, query: &[f32], top_n: usize) -> Result<Vec<(String, f32)>> {
        self.check_dimensions(query)?;
        let query = normalized(query).ok_or_else(|| ProjectionError::degenerate("query"))?;

        if top_n == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .words
            .units
            .iter()
            .enumerate()
            .filter_map(|(i, unit)| {
                unit.as_ref()
                    .map(|u| (i, dot_product(u, &query).clamp(-1.0, 1.0)))
            })
            .collect();

        let skipped = self.words.len() - scored.len();
        if skipped > 0 {
            tracing::debug!(model = %self.id, skipped, "Zero-norm vocabulary vectors skipped in neighbour scan");
        }

        // Stable sort keeps vocabulary order among ties
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_n);

        Ok(scored
            .into_iter()
            .map(|(i, score)| (self.words.labels[i].clone(), score))
            .collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================
