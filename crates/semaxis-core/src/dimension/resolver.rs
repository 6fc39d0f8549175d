//! Per-Model Dimension Resolution
//!
//! Different models trained on the same corpus can end up with different
//! vocabularies, so one dimension set is not portable across all of them.
//! The resolver maps each model to the set it supports, and validation runs
//! before any projection touches that model.

use std::collections::{BTreeMap, HashMap};

use crate::embeddings::EmbeddingModel;

use super::builder::{missing_vocabulary, MissingWord};
use super::pairs::DimensionSet;

/// Resolution errors
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A mapping or the default names a set that was never registered
    #[error("Unknown dimension set '{0}'")]
    UnknownSet(String),
    /// The model has no mapping and there is no default
    #[error("No dimension set configured for model '{0}'")]
    Unmapped(String),
    /// The resolved set references words the model does not know
    #[error("Model '{model}' lacks {} word(s) of dimension set '{set}'", .missing.len())]
    IncompleteVocabulary {
        /// Model identifier
        model: String,
        /// Dimension set name
        set: String,
        /// Every absent word
        missing: Vec<MissingWord>,
    },
}

/// Maps model identifiers to the dimension set each one supports
#[derive(Debug, Clone, Default)]
pub struct DimensionResolver {
    sets: BTreeMap<String, DimensionSet>,
    assignments: HashMap<String, String>,
    default_set: Option<String>,
}

impl DimensionResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dimension set under its own name
    pub fn register(&mut self, set: DimensionSet) {
        self.sets.insert(set.name.clone(), set);
    }

    /// Use `set_name` for every model without an explicit assignment
    pub fn set_default(&mut self, set_name: impl Into<String>) -> Result<(), ResolveError> {
        let set_name = set_name.into();
        if !self.sets.contains_key(&set_name) {
            return Err(ResolveError::UnknownSet(set_name));
        }
        self.default_set = Some(set_name);
        Ok(())
    }

    /// Assign a specific set to a model
    pub fn assign(
        &mut self,
        model_id: impl Into<String>,
        set_name: impl Into<String>,
    ) -> Result<(), ResolveError> {
        let set_name = set_name.into();
        if !self.sets.contains_key(&set_name) {
            return Err(ResolveError::UnknownSet(set_name));
        }
        self.assignments.insert(model_id.into(), set_name);
        Ok(())
    }

    /// Look up a registered set by name
    pub fn get(&self, set_name: &str) -> Option<&DimensionSet> {
        self.sets.get(set_name)
    }

    /// The dimension set a model should use
    pub fn resolve(&self, model_id: &str) -> Result<&DimensionSet, ResolveError> {
        let name = self
            .assignments
            .get(model_id)
            .or(self.default_set.as_ref())
            .ok_or_else(|| ResolveError::Unmapped(model_id.to_string()))?;
        self.sets
            .get(name)
            .ok_or_else(|| ResolveError::UnknownSet(name.clone()))
    }

    /// Resolve and check that every word of the set exists in the model
    pub fn validate<M: EmbeddingModel + ?Sized>(
        &self,
        model: &M,
    ) -> Result<&DimensionSet, ResolveError> {
        let set = self.resolve(model.id())?;
        let missing = missing_vocabulary(model, set);
        if !missing.is_empty() {
            return Err(ResolveError::IncompleteVocabulary {
                model: model.id().to_string(),
                set: set.name.clone(),
                missing,
            });
        }
        Ok(set)
    }
}
