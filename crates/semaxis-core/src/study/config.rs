//! Study Configuration
//!
//! A study is one JSON file naming the models, the dimension sets, which set
//! each model uses and the indicator groups to project:
//!
//! ```json
//! {
//!   "models": [
//!     { "id": "model_1", "words": "models/m1.words.vec", "keys": "models/m1.docs.vec" },
//!     { "id": "model_7", "words": "models/m7.words.vec", "keys": "models/m7.docs.vec" }
//!   ],
//!   "dimension_sets": {
//!     "education": [["universitet", "erhvervsskole"], ["forsker", "håndværker"]],
//!     "education_reduced": [["universitet", "erhvervsskole"], ["boglig", "praktisk"]]
//!   },
//!   "default_dimension": "education",
//!   "model_dimensions": { "model_7": "education_reduced" },
//!   "indicator_groups": [
//!     { "title": "party_year_embeddings", "keys_file": "keys/party_year.txt" }
//!   ],
//!   "top_n": 50
//! }
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use super::StudyError;
use crate::dimension::{DimensionResolver, DimensionSet, WordPair};

/// Environment variable overriding the default output directory
pub const OUTPUT_DIR_ENV: &str = "SEMAXIS_OUTPUT_DIR";

/// Neighbours requested per pole when the config does not say
pub const DEFAULT_TOP_N: usize = 50;

/// Table names the runner writes for every model
const RESERVED_STEMS: [&str; 2] = ["top_words", "word_pair_projection"];

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

/// One trained model on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    /// Identifier used for output directories and dimension assignment
    pub id: String,
    /// word2vec text file with vocabulary vectors
    pub words: PathBuf,
    /// word2vec text file with document/entity vectors
    #[serde(default)]
    pub keys: Option<PathBuf>,
}

/// A titled list of entity keys projected together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndicatorGroup {
    /// Output file stem, e.g. `speaker_party_year_embeddings`
    pub title: String,
    /// Inline keys
    #[serde(default)]
    pub keys: Vec<String>,
    /// File with one key per line, appended after inline keys
    #[serde(default)]
    pub keys_file: Option<PathBuf>,
}

impl IndicatorGroup {
    /// All keys for the group, first occurrence order, duplicates dropped
    pub fn resolve_keys(&self) -> Result<Vec<String>, StudyError> {
        let mut keys = self.keys.clone();
        if let Some(path) = &self.keys_file {
            let content = fs::read_to_string(path).map_err(|source| StudyError::Io {
                path: path.clone(),
                source,
            })?;
            keys.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            );
        }

        let mut seen = HashSet::new();
        keys.retain(|k| seen.insert(k.clone()));
        Ok(keys)
    }
}

/// Full description of a projection study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudyConfig {
    /// Models to load
    pub models: Vec<ModelSpec>,
    /// Named dimension sets
    pub dimension_sets: BTreeMap<String, Vec<WordPair>>,
    /// Set used by models without an explicit assignment
    #[serde(default)]
    pub default_dimension: Option<String>,
    /// Model id → dimension set name
    #[serde(default)]
    pub model_dimensions: BTreeMap<String, String>,
    /// Indicator groups projected for every model
    #[serde(default)]
    pub indicator_groups: Vec<IndicatorGroup>,
    /// Neighbours requested per pole for pole discovery
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Words projected for each model; the set's own words when empty
    #[serde(default)]
    pub probe_words: Vec<String>,
    /// Drop keys absent from a model instead of failing the job
    #[serde(default)]
    pub skip_missing_keys: bool,
    /// Upper bound on concurrently running jobs
    #[serde(default)]
    pub max_concurrent_jobs: Option<usize>,
    /// Where tables and the manifest are written
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl StudyConfig {
    /// Read, resolve relative paths and validate a config file
    pub fn load(path: &Path) -> Result<Self, StudyError> {
        let content = fs::read_to_string(path).map_err(|source| StudyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: StudyConfig =
            serde_json::from_str(&content).map_err(|source| StudyError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base);
        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            models = config.models.len(),
            dimension_sets = config.dimension_sets.len(),
            groups = config.indicator_groups.len(),
            "Loaded study config"
        );
        Ok(config)
    }

    /// Make every relative path absolute with respect to `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        for model in &mut self.models {
            rebase(&mut model.words);
            if let Some(keys) = model.keys.as_mut() {
                rebase(keys);
            }
        }
        for group in &mut self.indicator_groups {
            if let Some(file) = group.keys_file.as_mut() {
                rebase(file);
            }
        }
        if let Some(dir) = self.output_dir.as_mut() {
            rebase(dir);
        }
    }

    /// Check internal consistency without touching model files
    pub fn validate(&self) -> Result<(), StudyError> {
        let invalid = |msg: String| Err(StudyError::Config(msg));

        if self.models.is_empty() {
            return invalid("no models configured".into());
        }
        if self.dimension_sets.is_empty() {
            return invalid("no dimension sets configured".into());
        }
        if self.top_n == 0 {
            return invalid("top_n must be at least 1".into());
        }
        if self.max_concurrent_jobs == Some(0) {
            return invalid("max_concurrent_jobs must be at least 1".into());
        }
        if let Some(jobs) = self.max_concurrent_jobs
            && jobs > Semaphore::MAX_PERMITS
        {
            return invalid(format!(
                "max_concurrent_jobs must be at most {}",
                Semaphore::MAX_PERMITS
            ));
        }
        for (name, pairs) in &self.dimension_sets {
            if pairs.is_empty() {
                return invalid(format!("dimension set '{name}' has no pairs"));
            }
        }

        let mut ids = HashSet::new();
        for model in &self.models {
            if !is_safe_name(&model.id) {
                return invalid(format!("model id '{}' is not a valid file name", model.id));
            }
            if !ids.insert(model.id.as_str()) {
                return invalid(format!("duplicate model id '{}'", model.id));
            }
        }

        let mut titles = HashSet::new();
        for group in &self.indicator_groups {
            if !is_safe_name(&group.title) {
                return invalid(format!(
                    "indicator group title '{}' is not a valid file name",
                    group.title
                ));
            }
            if RESERVED_STEMS.contains(&group.title.as_str()) {
                return invalid(format!(
                    "indicator group title '{}' collides with a per-model table",
                    group.title
                ));
            }
            if !titles.insert(group.title.as_str()) {
                return invalid(format!("duplicate indicator group '{}'", group.title));
            }
        }

        for model in self.model_dimensions.keys() {
            if !ids.contains(model.as_str()) {
                tracing::warn!(model = %model, "Dimension assignment for unknown model ignored");
            }
        }

        // Every model must resolve to some set
        let resolver = self.resolver()?;
        for model in &self.models {
            resolver.resolve(&model.id)?;
        }
        Ok(())
    }

    /// Dimension sets as ordered, named values
    pub fn dimension_set(&self, name: &str) -> Option<DimensionSet> {
        self.dimension_sets
            .get(name)
            .map(|pairs| DimensionSet::new(name, pairs.iter().cloned()))
    }

    /// Build the per-model dimension resolver
    ///
    /// With a single dimension set and no explicit default, that set is the
    /// default.
    pub fn resolver(&self) -> Result<DimensionResolver, StudyError> {
        let mut resolver = DimensionResolver::new();
        for (name, pairs) in &self.dimension_sets {
            resolver.register(DimensionSet::new(name.clone(), pairs.iter().cloned()));
        }

        let default = self.default_dimension.clone().or_else(|| {
            (self.dimension_sets.len() == 1)
                .then(|| self.dimension_sets.keys().next().cloned())
                .flatten()
        });
        if let Some(default) = default {
            resolver.set_default(default)?;
        }
        for (model, set) in &self.model_dimensions {
            resolver.assign(model.clone(), set.clone())?;
        }
        Ok(resolver)
    }

    /// Output directory: config value, then `SEMAXIS_OUTPUT_DIR`, then the
    /// platform data directory
    pub fn output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV)
            && !dir.is_empty()
        {
            return PathBuf::from(dir);
        }
        default_output_dir()
    }

    /// Concurrency bound for the runner, always a valid semaphore size
    pub fn max_concurrent_jobs(&self) -> usize {
        self.max_concurrent_jobs
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4)
            })
            .clamp(1, Semaphore::MAX_PERMITS)
    }
}

/// Platform data directory for projection tables
///
/// Linux: ~/.local/share/semaxis/projections
/// macOS: ~/Library/Application Support/org.semaxis.semaxis/projections
pub fn default_output_dir() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("org", "semaxis", "semaxis") {
        return proj_dirs.data_dir().join("projections");
    }
    PathBuf::from("projections")
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
