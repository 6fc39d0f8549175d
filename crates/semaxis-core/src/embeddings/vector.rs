//! Vector Arithmetic
//!
//! The handful of dense-vector operations the engine needs. All functions
//! take plain slices so they work on borrowed model storage without copying.

use crate::error::{ProjectionError, Result};

// ============================================================================
// SIMILARITY FUNCTIONS
// ============================================================================

/// Compute dot product between two vectors
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum::<f64>() as f32
}

/// Euclidean (L2) length of a vector
#[inline]
pub fn l2_norm(v: &[f32]) -> f32 {
    squared_norm(v).sqrt() as f32
}

/// Sums run in f64 so tiny or huge components neither underflow nor overflow
#[inline]
fn squared_norm(v: &[f32]) -> f64 {
    v.iter().map(|&x| f64::from(x) * f64::from(x)).sum()
}

/// Cosine similarity `dot(a, b) / (|a| * |b|)`
///
/// `label` names the entity behind `a` and is reported if either vector has
/// zero length. The result is clamped to [-1, 1].
pub fn cosine_similarity(label: &str, a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ProjectionError::DimensionMismatch {
            expected: b.len(),
            got: a.len(),
        });
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if !is_usable_norm(norm_b) {
        return Err(ProjectionError::degenerate("direction"));
    }
    if !is_usable_norm(norm_a) {
        return Err(ProjectionError::degenerate(label));
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    Ok((similarity as f32).clamp(-1.0, 1.0))
}

#[inline]
fn is_usable_norm(squared: f64) -> bool {
    squared > 0.0 && squared.is_finite()
}

/// Component-wise mean of equal-length vectors
///
/// Returns `None` for an empty input. Callers are expected to have checked
/// lengths already.
pub fn mean_vector<'a, I>(vectors: I) -> Option<Vec<f32>>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut iter = vectors.into_iter();
    let first = iter.next()?;
    let mut sum: Vec<f64> = first.iter().map(|&x| f64::from(x)).collect();
    let mut count = 1usize;

    for v in iter {
        for (acc, &x) in sum.iter_mut().zip(v.iter()) {
            *acc += f64::from(x);
        }
        count += 1;
    }

    let count = count as f64;
    Some(sum.into_iter().map(|x| (x / count) as f32).collect())
}

/// Return a unit-length copy of `v`, or `None` if it has no usable length
pub fn normalized(v: &[f32]) -> Option<Vec<f32>> {
    let squared = squared_norm(v);
    if is_usable_norm(squared) {
        let norm = squared.sqrt();
        Some(v.iter().map(|&x| (f64::from(x) / norm) as f32).collect())
    } else {
        None
    }
}

// ============================================================================
// TESTS
// ============================================================================
