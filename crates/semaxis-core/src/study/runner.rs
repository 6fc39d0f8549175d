//! Study Runner
//!
//! Loads every model, validates each against the dimension set it resolves
//! to, then runs one job per (model × indicator group) plus a pole-discovery
//! and a word-projection job per model. Jobs share read-only models through
//! `Arc` and run on blocking workers, bounded by a semaphore. A failing job
//! or model never stops the others.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use uuid::Uuid;

use super::config::StudyConfig;
use super::report::{JobKind, JobOutcome, JobStatus, StudyReport, MANIFEST_FILE};
use super::StudyError;
use crate::dimension::DimensionSet;
use crate::embeddings::{EmbeddingModel, InMemoryModel};
use crate::projection::{discover_poles, project_indicators, project_words, ProjectionResult};
use crate::store::write_projection_csv;

/// Inputs shared by every job of a run
struct JobContext {
    output_dir: PathBuf,
    groups: Vec<(String, Vec<String>)>,
    top_n: usize,
    probe_words: Vec<String>,
    skip_missing_keys: bool,
}

/// A model that passed validation
struct ReadyModel {
    model: Arc<InMemoryModel>,
    set: Arc<DimensionSet>,
}

/// Run a study, writing tables and `manifest.json` under `output_dir`
pub async fn run_study(config: &StudyConfig, output_dir: &Path) -> Result<StudyReport, StudyError> {
    let started_at = Utc::now();
    let run_id = Uuid::new_v4();
    let resolver = config.resolver()?;

    let mut groups = Vec::with_capacity(config.indicator_groups.len());
    for group in &config.indicator_groups {
        groups.push((group.title.clone(), group.resolve_keys()?));
    }

    tracing::info!(
        %run_id,
        models = config.models.len(),
        groups = groups.len(),
        output_dir = %output_dir.display(),
        "Starting study"
    );

    let ctx = Arc::new(JobContext {
        output_dir: output_dir.to_path_buf(),
        groups,
        top_n: config.top_n,
        probe_words: config.probe_words.clone(),
        skip_missing_keys: config.skip_missing_keys,
    });

    let job_kinds: Vec<JobKind> = ctx
        .groups
        .iter()
        .map(|(title, _)| JobKind::Indicators {
            group: title.clone(),
        })
        .chain([JobKind::TopWords, JobKind::WordPairProjection])
        .collect();

    // Load all models concurrently
    let mut loads = JoinSet::new();
    for (index, spec) in config.models.iter().cloned().enumerate() {
        loads.spawn_blocking(move || {
            let loaded =
                InMemoryModel::from_word2vec_files(spec.id.clone(), &spec.words, spec.keys.as_deref());
            (index, loaded)
        });
    }
    let mut loaded: Vec<Option<Result<InMemoryModel, String>>> =
        (0..config.models.len()).map(|_| None).collect();
    while let Some(joined) = loads.join_next().await {
        let (index, result) = joined.map_err(|e| StudyError::Join(e.to_string()))?;
        loaded[index] = Some(result.map_err(|e| e.to_string()));
    }

    // Validate, recording every job of a rejected model as failed
    let mut outcomes: Vec<Option<JobOutcome>> = Vec::new();
    let mut pending: Vec<(usize, Arc<ReadyModel>, JobKind)> = Vec::new();

    for (spec, load) in config.models.iter().zip(loaded) {
        let dimension_set = resolver.resolve(&spec.id).ok().map(|s| s.name.clone());

        let ready = match load {
            Some(Ok(model)) => match resolver.validate(&model) {
                Ok(set) => Ok(Arc::new(ReadyModel {
                    set: Arc::new(set.clone()),
                    model: Arc::new(model),
                })),
                Err(e) => Err(e.to_string()),
            },
            Some(Err(e)) => Err(e),
            None => Err("model load did not complete".to_string()),
        };

        match ready {
            Ok(ready) => {
                for kind in &job_kinds {
                    pending.push((outcomes.len(), Arc::clone(&ready), kind.clone()));
                    outcomes.push(None);
                }
            }
            Err(error) => {
                tracing::warn!(model = %spec.id, %error, "Model rejected, skipping its jobs");
                for kind in &job_kinds {
                    outcomes.push(Some(JobOutcome {
                        model: spec.id.clone(),
                        dimension_set: dimension_set.clone(),
                        job: kind.clone(),
                        status: JobStatus::Failed {
                            error: error.clone(),
                        },
                    }));
                }
            }
        }
    }

    // Run jobs
    let permits = Arc::new(Semaphore::new(config.max_concurrent_jobs()));
    let mut jobs = JoinSet::new();
    for (slot, ready, kind) in pending {
        let permits = Arc::clone(&permits);
        let ctx = Arc::clone(&ctx);
        jobs.spawn(async move {
            let model_id = ready.model.id().to_string();
            let set_name = ready.set.name.clone();
            let status = match permits.acquire_owned().await {
                Ok(permit) => {
                    let job = kind.clone();
                    let handle = tokio::task::spawn_blocking(move || {
                        let _permit = permit;
                        execute_job(&ready, &job, &ctx)
                    });
                    match handle.await {
                        Ok(Ok((rows, output))) => JobStatus::Succeeded { rows, output },
                        Ok(Err(e)) => JobStatus::Failed {
                            error: e.to_string(),
                        },
                        Err(e) => JobStatus::Failed {
                            error: format!("job panicked or was cancelled: {e}"),
                        },
                    }
                }
                Err(e) => JobStatus::Failed {
                    error: format!("scheduler closed: {e}"),
                },
            };
            (
                slot,
                JobOutcome {
                    model: model_id,
                    dimension_set: Some(set_name),
                    job: kind,
                    status,
                },
            )
        });
    }

    while let Some(joined) = jobs.join_next().await {
        let (slot, outcome) = joined.map_err(|e| StudyError::Join(e.to_string()))?;
        match &outcome.status {
            JobStatus::Succeeded { rows, output } => tracing::info!(
                model = %outcome.model,
                job = outcome.job.file_stem(),
                rows,
                output = %output.display(),
                "Job finished"
            ),
            JobStatus::Failed { error } => tracing::warn!(
                model = %outcome.model,
                job = outcome.job.file_stem(),
                %error,
                "Job failed"
            ),
        }
        outcomes[slot] = Some(outcome);
    }

    let report = StudyReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        output_dir: output_dir.to_path_buf(),
        jobs: outcomes.into_iter().flatten().collect(),
    };

    std::fs::create_dir_all(output_dir).map_err(|source| StudyError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;
    report.write_manifest(&output_dir.join(MANIFEST_FILE))?;

    tracing::info!(
        %run_id,
        succeeded = report.succeeded().count(),
        failed = report.failed().count(),
        "Study complete"
    );
    Ok(report)
}

/// Run one job synchronously and write its table
fn execute_job(
    ready: &ReadyModel,
    job: &JobKind,
    ctx: &JobContext,
) -> Result<(usize, PathBuf), StudyError> {
    let model = ready.model.as_ref();
    let set = ready.set.as_ref();

    let result: ProjectionResult = match job {
        JobKind::Indicators { group } => {
            let keys = ctx
                .groups
                .iter()
                .find(|(title, _)| title == group)
                .map(|(_, keys)| keys.as_slice())
                .ok_or_else(|| StudyError::Config(format!("unknown indicator group '{group}'")))?;

            if ctx.skip_missing_keys {
                let present: Vec<&str> = keys
                    .iter()
                    .map(String::as_str)
                    .filter(|k| model.contains_key(k))
                    .collect();
                let dropped = keys.len() - present.len();
                if dropped > 0 {
                    tracing::warn!(
                        model = %model.id(),
                        group = %group,
                        dropped,
                        "Indicator keys absent from model were skipped"
                    );
                }
                project_indicators(model, set, &present)?
            } else {
                project_indicators(model, set, keys)?
            }
        }
        JobKind::TopWords => discover_poles(model, set, ctx.top_n)?,
        JobKind::WordPairProjection => project_words(model, set, Some(ctx.probe_words.as_slice()))?,
    };

    let output = ctx
        .output_dir
        .join(model.id())
        .join(format!("{}.csv", job.file_stem()));
    write_projection_csv(&output, &result)?;
    Ok((result.len(), output))
}
