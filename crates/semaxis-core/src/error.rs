//! Engine error taxonomy
//!
//! Every failure the dimension builder and projection engine can raise.
//! None of these are recovered locally: they go straight back to the caller,
//! which decides whether to skip the entity, pair or model, or abort.

use std::fmt;

/// Which lookup table a key was resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySpace {
    /// Document / speaker / party-year tags (`embedding_by_key`)
    Entity,
    /// Vocabulary words (`embedding_by_word`)
    Vocabulary,
}

impl fmt::Display for KeySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySpace::Entity => write!(f, "entity"),
            KeySpace::Vocabulary => write!(f, "vocabulary"),
        }
    }
}

/// Errors raised while building directions or projecting onto them
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    /// A dimension-set word is absent from the model vocabulary
    #[error("Missing vocabulary: '{word}' (pair {pair_index}) is not in the model vocabulary")]
    MissingVocabulary {
        /// The absent word
        word: String,
        /// Zero-based index of the pair that referenced it
        pair_index: usize,
    },
    /// A requested indicator key or word is absent from the model
    #[error("Missing key: '{key}' not found in {space} lookup")]
    MissingKey {
        /// The absent key
        key: String,
        /// Which lookup was used
        space: KeySpace,
    },
    /// Cosine similarity against a zero-norm (or non-finite) vector
    #[error("Degenerate norm: embedding for '{entity}' has zero or non-finite length")]
    DegenerateNorm {
        /// Entity whose vector was degenerate
        entity: String,
    },
    /// A dimension set with no pairs cannot define a direction
    #[error("Dimension set '{0}' has no word pairs")]
    EmptyDimensionSet(String),
    /// Vector lengths disagree with the model dimension
    #[error("Invalid dimensions: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Model-wide dimension
        expected: usize,
        /// Offending vector length
        got: usize,
    },
}

impl ProjectionError {
    pub(crate) fn missing_key(key: impl Into<String>, space: KeySpace) -> Self {
        Self::MissingKey {
            key: key.into(),
            space,
        }
    }

    pub(crate) fn degenerate(entity: impl Into<String>) -> Self {
        Self::DegenerateNorm {
            entity: entity.into(),
        }
    }
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, ProjectionError>;
