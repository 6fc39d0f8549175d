//! Study Module
//!
//! Batch projection across many models:
//! - JSON study configuration with per-model dimension sets
//! - A concurrent runner that writes one table per (model, job)
//! - A run manifest recording every outcome

mod config;
mod report;
mod runner;

use std::io;
use std::path::PathBuf;

use crate::dimension::ResolveError;
use crate::embeddings::LoadError;
use crate::error::ProjectionError;
use crate::store::StoreError;

pub use config::{
    default_output_dir, IndicatorGroup, ModelSpec, StudyConfig, DEFAULT_TOP_N, OUTPUT_DIR_ENV,
};
pub use report::{JobKind, JobOutcome, JobStatus, StudyReport, MANIFEST_FILE};
pub use runner::run_study;

/// Study errors
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    /// Config is inconsistent
    #[error("Invalid study config: {0}")]
    Config(String),
    /// File access failed
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
    /// JSON encoding/decoding failed
    #[error("JSON error in {path}: {source}")]
    Json {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
    /// Model could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Dimension set could not be resolved or validated
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// Projection failed
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    /// Table could not be written
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A worker task died
    #[error("Worker task failed: {0}")]
    Join(String),
}
