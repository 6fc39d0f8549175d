//! Study Reports
//!
//! The runner records one outcome per job and persists the whole report as
//! `manifest.json` next to the tables, so every CSV can be traced back to the
//! model and dimension set that produced it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StudyError;

/// File name of the run manifest inside the output directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// What a job produced
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobKind {
    /// Indicator keys of one group projected onto the axis
    Indicators {
        /// Group title
        group: String,
    },
    /// Pole vocabulary discovery
    TopWords,
    /// Probe / seed words projected onto the axis
    WordPairProjection,
}

impl JobKind {
    /// Output file stem for the job
    pub fn file_stem(&self) -> &str {
        match self {
            JobKind::Indicators { group } => group,
            JobKind::TopWords => "top_words",
            JobKind::WordPairProjection => "word_pair_projection",
        }
    }
}

/// How a job ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    /// Table written
    Succeeded {
        /// Rows written
        rows: usize,
        /// Table location
        output: PathBuf,
    },
    /// Nothing written
    Failed {
        /// Rendered error
        error: String,
    },
}

/// Outcome of one (model, job) combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    /// Model identifier
    pub model: String,
    /// Dimension set used, if one resolved
    pub dimension_set: Option<String>,
    /// What was projected
    pub job: JobKind,
    /// Result
    #[serde(flatten)]
    pub status: JobStatus,
}

impl JobOutcome {
    /// Whether the job wrote its table
    pub fn is_success(&self) -> bool {
        matches!(self.status, JobStatus::Succeeded { .. })
    }
}

/// Everything a study run did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyReport {
    /// Unique run identifier
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the last job finished
    pub finished_at: DateTime<Utc>,
    /// Directory holding tables and manifest
    pub output_dir: PathBuf,
    /// One entry per job, model order then job order
    pub jobs: Vec<JobOutcome>,
}

impl StudyReport {
    /// Successful jobs
    pub fn succeeded(&self) -> impl Iterator<Item = &JobOutcome> {
        self.jobs.iter().filter(|j| j.is_success())
    }

    /// Failed jobs
    pub fn failed(&self) -> impl Iterator<Item = &JobOutcome> {
        self.jobs.iter().filter(|j| !j.is_success())
    }

    /// True when every job succeeded
    pub fn is_success(&self) -> bool {
        self.jobs.iter().all(JobOutcome::is_success)
    }

    /// Outcome for a specific model and job
    pub fn find(&self, model: &str, job: &JobKind) -> Option<&JobOutcome> {
        self.jobs.iter().find(|j| j.model == model && &j.job == job)
    }

    /// Write the report as pretty JSON
    pub fn write_manifest(&self, path: &Path) -> Result<(), StudyError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| StudyError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| StudyError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a manifest written by [`StudyReport::write_manifest`]
    pub fn read_manifest(path: &Path) -> Result<Self, StudyError> {
        let content = fs::read_to_string(path).map_err(|source| StudyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StudyError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
