//! Projection Engine
//!
//! Every operation derives its own direction vector from the (model,
//! dimension set) it is given. Nothing is cached between calls, so a result
//! can always be traced back to exactly those two inputs.

use std::collections::HashSet;

use crate::dimension::{build_direction, DimensionSet, DirectionVector};
use crate::embeddings::{cosine_similarity, EmbeddingModel};
use crate::error::{ProjectionError, Result};

use super::result::{EntityKind, ProjectionResult, ProjectionRow};

fn project_with<'e, F, I>(
    direction: &DirectionVector,
    entities: I,
    kind: EntityKind,
    lookup: F,
) -> Result<ProjectionResult>
where
    I: IntoIterator<Item = &'e str>,
    F: Fn(&str) -> Result<&'e [f32]>,
{
    let rows = entities
        .into_iter()
        .map(|entity| {
            let vector = lookup(entity)?;
            let similarity = cosine_similarity(entity, vector, direction.as_slice())?;
            Ok(ProjectionRow {
                entity: entity.to_string(),
                similarity,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ProjectionResult { kind, rows })
}

/// Project entity keys onto the axis defined by `set`
///
/// One row per key, in input order. The first key missing from the model
/// aborts the call with `MissingKey`; filter keys beforehand if a partial
/// table is acceptable.
pub fn project_indicators<'a, M, S>(
    model: &'a M,
    set: &DimensionSet,
    indicator_keys: &'a [S],
) -> Result<ProjectionResult>
where
    M: EmbeddingModel + ?Sized,
    S: AsRef<str>,
{
    let direction = build_direction(model, set)?;
    let result = project_with(
        &direction,
        indicator_keys.iter().map(|k| k.as_ref()),
        EntityKind::Indicator,
        |key| model.embedding_by_key(key),
    )?;

    tracing::debug!(
        model = %model.id(),
        dimension_set = %set.name,
        rows = result.len(),
        "Projected indicators"
    );
    Ok(result)
}

/// Project vocabulary words onto the axis defined by `set`
///
/// With `None` (or an empty slice) the set's own flattened words are
/// projected, positive then negative per pair, which is a quick check that
/// the seed pairs separate cleanly along the axis.
pub fn project_words<'a, M, S>(
    model: &'a M,
    set: &'a DimensionSet,
    words: Option<&'a [S]>,
) -> Result<ProjectionResult>
where
    M: EmbeddingModel + ?Sized,
    S: AsRef<str>,
{
    let direction = build_direction(model, set)?;
    let lookup = |word: &str| model.embedding_by_word(word);

    let result = match words {
        Some(words) if !words.is_empty() => project_with(
            &direction,
            words.iter().map(|w| w.as_ref()),
            EntityKind::Word,
            lookup,
        )?,
        _ => project_with(&direction, set.words(), EntityKind::Word, lookup)?,
    };

    tracing::debug!(
        model = %model.id(),
        dimension_set = %set.name,
        rows = result.len(),
        "Projected words"
    );
    Ok(result)
}

/// Vocabulary most aligned with each pole of the axis, seed words excluded
///
/// Queries `top_n` neighbours of the negated axis and of the axis itself,
/// drops every word used by `set` (and any repeat), and re-projects the
/// survivors with [`project_words`] so scores are cosine-to-axis. Rows are
/// the negative-pole words followed by the positive-pole words, each group
/// in neighbour order. An empty table is a valid result.
pub fn discover_poles<M>(model: &M, set: &DimensionSet, top_n: usize) -> Result<ProjectionResult>
where
    M: EmbeddingModel + ?Sized,
{
    let direction = build_direction(model, set)?;
    let norm = direction.norm();
    if !(norm > 0.0 && norm.is_finite()) {
        return Err(ProjectionError::degenerate("direction"));
    }

    let high = model.nearest_neighbors(direction.as_slice(), top_n)?;
    let low = model.nearest_neighbors(direction.negated().as_slice(), top_n)?;

    let seeds = set.vocabulary();
    let mut seen: HashSet<&str> = HashSet::new();
    let candidates: Vec<&str> = low
        .iter()
        .chain(high.iter())
        .map(|(word, _)| word.as_str())
        .filter(|word| !seeds.contains(word))
        .filter(|word| seen.insert(*word))
        .collect();

    tracing::debug!(
        model = %model.id(),
        dimension_set = %set.name,
        top_n,
        low = low.len(),
        high = high.len(),
        kept = candidates.len(),
        "Discovered pole vocabulary"
    );

    if candidates.is_empty() {
        return Ok(ProjectionResult::empty(EntityKind::Word));
    }
    project_words(model, set, Some(candidates.as_slice()))
}
