//! Projection Result Tables

use serde::{Deserialize, Serialize};

/// What the first column of a projection table holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Document / speaker / party-year keys
    Indicator,
    /// Vocabulary words
    Word,
}

impl EntityKind {
    /// Column header used when persisting
    pub fn column(&self) -> &'static str {
        match self {
            EntityKind::Indicator => "indicator",
            EntityKind::Word => "word",
        }
    }
}

/// One projected entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// Indicator key or word
    pub entity: String,
    /// Cosine similarity to the axis, in [-1, 1]
    pub similarity: f32,
}

/// An ordered (entity, similarity) table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Kind of entity in the first column
    pub kind: EntityKind,
    /// Rows in operation-defined order
    pub rows: Vec<ProjectionRow>,
}

impl ProjectionResult {
    /// Empty table of the given kind
    pub fn empty(kind: EntityKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Entity column in row order
    pub fn entities(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.entity.as_str()).collect()
    }

    /// Similarity column in row order
    pub fn similarities(&self) -> Vec<f32> {
        self.rows.iter().map(|r| r.similarity).collect()
    }

    /// Similarity for a specific entity, if present
    pub fn get(&self, entity: &str) -> Option<f32> {
        self.rows
            .iter()
            .find(|r| r.entity == entity)
            .map(|r| r.similarity)
    }

    /// Mean similarity, `None` for an empty table
    pub fn mean(&self) -> Option<f32> {
        if self.rows.is_empty() {
            return None;
        }
        Some(self.rows.iter().map(|r| r.similarity).sum::<f32>() / self.rows.len() as f32)
    }

    /// Rows sorted by descending similarity; the table itself is untouched
    pub fn ranked(&self) -> Vec<&ProjectionRow> {
        let mut rows: Vec<&ProjectionRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        rows
    }
}
