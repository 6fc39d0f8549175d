//! Direction Vector Construction
//!
//! The axis is the mean, over all pairs, of `embedding(positive) -
//! embedding(negative)`. Averaging per-pair differences lets each pair
//! contribute its own local sense of the contrast while the consistent
//! positive-minus-negative ordering keeps the sign meaningful.

use crate::embeddings::{EmbeddingModel, l2_norm, mean_vector};
use crate::error::{KeySpace, ProjectionError, Result};

use super::pairs::DimensionSet;

/// A semantic axis in one model's embedding space
///
/// Always derived fresh from a (model, dimension set) combination and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionVector {
    vector: Vec<f32>,
}

impl DirectionVector {
    /// Wrap a raw vector
    pub fn from_vec(vector: Vec<f32>) -> Self {
        Self { vector }
    }

    /// Components of the axis
    pub fn as_slice(&self) -> &[f32] {
        &self.vector
    }

    /// Euclidean length
    pub fn norm(&self) -> f32 {
        l2_norm(&self.vector)
    }

    /// The opposite pole
    pub fn negated(&self) -> Self {
        Self {
            vector: self.vector.iter().map(|x| -x).collect(),
        }
    }
}

/// A dimension-set word missing from a model's vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingWord {
    /// Zero-based pair index
    pub pair_index: usize,
    /// The absent word
    pub word: String,
}

fn word_vector<'m, M: EmbeddingModel + ?Sized>(
    model: &'m M,
    word: &str,
    pair_index: usize,
) -> Result<&'m [f32]> {
    match model.embedding_by_word(word) {
        Ok(v) => Ok(v),
        Err(ProjectionError::MissingKey {
            space: KeySpace::Vocabulary,
            ..
        }) => Err(ProjectionError::MissingVocabulary {
            word: word.to_string(),
            pair_index,
        }),
        Err(other) => Err(other),
    }
}

/// Build the direction vector for `set` in `model`'s space
///
/// Fails on an empty set, and on the first word that does not resolve,
/// naming the word and its pair. No pair is ever skipped.
pub fn build_direction<M: EmbeddingModel + ?Sized>(
    model: &M,
    set: &DimensionSet,
) -> Result<DirectionVector> {
    if set.is_empty() {
        return Err(ProjectionError::EmptyDimensionSet(set.name.clone()));
    }

    let dims = model.dimensions();
    let mut differences: Vec<Vec<f32>> = Vec::with_capacity(set.len());

    for (pair_index, pair) in set.pairs.iter().enumerate() {
        let positive = word_vector(model, &pair.positive, pair_index)?;
        let negative = word_vector(model, &pair.negative, pair_index)?;

        for v in [positive, negative] {
            if v.len() != dims {
                return Err(ProjectionError::DimensionMismatch {
                    expected: dims,
                    got: v.len(),
                });
            }
        }

        differences.push(positive.iter().zip(negative).map(|(p, n)| p - n).collect());
    }

    let mean = mean_vector(differences.iter().map(Vec::as_slice))
        .ok_or_else(|| ProjectionError::EmptyDimensionSet(set.name.clone()))?;

    tracing::debug!(
        model = %model.id(),
        dimension_set = %set.name,
        pairs = set.len(),
        "Built direction vector"
    );

    Ok(DirectionVector::from_vec(mean))
}

/// Every dimension-set word absent from the model, in pair order
///
/// Unlike [`build_direction`] this does not stop at the first gap, so a
/// validation report can list everything that needs substituting.
pub fn missing_vocabulary<M: EmbeddingModel + ?Sized>(
    model: &M,
    set: &DimensionSet,
) -> Vec<MissingWord> {
    set.pairs
        .iter()
        .enumerate()
        .flat_map(move |(pair_index, pair)| {
            [&pair.positive, &pair.negative]
                .into_iter()
                .filter(move |w| !model.contains_word(w))
                .map(move |w| MissingWord {
                    pair_index,
                    word: w.clone(),
                })
        })
        .collect()
}
