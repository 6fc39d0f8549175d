//! Semaxis CLI
//!
//! Command-line interface for building semantic axes and projecting
//! embedding models onto them.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use semaxis_core::study::{JobStatus, StudyConfig};
use semaxis_core::{
    discover_poles, missing_vocabulary, project_indicators, project_words, read_projection_csv,
    run_study, write_projection_csv, DimensionSet, EmbeddingModel, InMemoryModel,
    ProjectionResult,
};

/// Semaxis - Semantic Dimension & Projection Engine CLI
#[derive(Parser)]
#[command(name = "semaxis")]
#[command(author = "Semaxis Developers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Project embedding models onto semantic axes defined by word pairs")]
#[command(long_about = "Semaxis builds a direction vector from antonymous word pairs and measures where documents, speakers and words fall along it.\n\nModels are read in word2vec text format.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a study described by a JSON config
    Run {
        /// Path to the study config
        config: PathBuf,
        /// Override the output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Load every model of a study and report missing seed vocabulary
    Validate {
        /// Path to the study config
        config: PathBuf,
    },

    /// Project words onto an axis
    Words {
        /// word2vec text file with vocabulary vectors
        #[arg(long)]
        model: PathBuf,
        /// Pair list, one `<positive> <negative>` per line
        #[arg(long)]
        pairs: PathBuf,
        /// Word to project (repeatable); defaults to the seed words
        #[arg(long = "word")]
        words: Vec<String>,
        /// Write the table to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Project entity keys (document tags) onto an axis
    Indicators {
        /// word2vec text file with vocabulary vectors
        #[arg(long)]
        model: PathBuf,
        /// word2vec text file with entity-key vectors
        #[arg(long)]
        keys_model: PathBuf,
        /// Pair list, one `<positive> <negative>` per line
        #[arg(long)]
        pairs: PathBuf,
        /// Entity key to project (repeatable)
        #[arg(long = "key", required = true)]
        keys: Vec<String>,
        /// Write the table to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the vocabulary nearest each pole of an axis
    Poles {
        /// word2vec text file with vocabulary vectors
        #[arg(long)]
        model: PathBuf,
        /// Pair list, one `<positive> <negative>` per line
        #[arg(long)]
        pairs: PathBuf,
        /// Neighbours requested per pole
        #[arg(long, default_value = "50")]
        top_n: usize,
        /// Write the table to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Pretty-print a stored projection table
    Show {
        /// CSV file written by a previous command or study
        file: PathBuf,
        /// Sort rows from most positive to most negative
        #[arg(long)]
        ranked: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output_dir } => run_study_command(config, output_dir).await,
        Commands::Validate { config } => run_validate(config),
        Commands::Words {
            model,
            pairs,
            words,
            output,
        } => run_words(model, pairs, words, output),
        Commands::Indicators {
            model,
            keys_model,
            pairs,
            keys,
            output,
        } => run_indicators(model, keys_model, pairs, keys, output),
        Commands::Poles {
            model,
            pairs,
            top_n,
            output,
        } => run_poles(model, pairs, top_n, output),
        Commands::Show { file, ranked } => run_show(file, ranked),
    }
}

/// Run a full study
async fn run_study_command(config: PathBuf, output_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let study = StudyConfig::load(&config)
        .with_context(|| format!("Failed to load study config {}", config.display()))?;
    let output_dir = output_dir.unwrap_or_else(|| study.output_dir());

    println!("{}", "=== Semaxis Study ===".cyan().bold());
    println!("{}: {}", "Config".white().bold(), config.display());
    println!("{}: {}", "Output".white().bold(), output_dir.display());
    println!();

    let report = run_study(&study, &output_dir).await?;

    for job in &report.jobs {
        let set = job.dimension_set.as_deref().unwrap_or("-");
        match &job.status {
            JobStatus::Succeeded { rows, .. } => println!(
                "  {} {:12} {:28} {:20} {} rows",
                "OK".green().bold(),
                job.model,
                job.job.file_stem(),
                set.dimmed(),
                rows
            ),
            JobStatus::Failed { error } => println!(
                "  {} {:12} {:28} {:20} {}",
                "FAIL".red().bold(),
                job.model,
                job.job.file_stem(),
                set.dimmed(),
                error.red()
            ),
        }
    }

    let succeeded = report.succeeded().count();
    let failed = report.failed().count();
    println!();
    println!("{}: {}", "Run".white().bold(), report.run_id);
    println!(
        "{}: {} succeeded, {} failed",
        "Jobs".white().bold(),
        succeeded.to_string().green(),
        if failed > 0 {
            failed.to_string().red()
        } else {
            failed.to_string().normal()
        }
    );

    if failed > 0 {
        bail!("{failed} job(s) failed");
    }
    Ok(())
}

/// Load each model and list seed words it cannot represent
fn run_validate(config: PathBuf) -> anyhow::Result<()> {
    let study = StudyConfig::load(&config)
        .with_context(|| format!("Failed to load study config {}", config.display()))?;
    let resolver = study.resolver()?;

    println!("{}", "=== Semaxis Validation ===".cyan().bold());
    println!();

    let mut problems = 0usize;
    for spec in &study.models {
        let set = resolver.resolve(&spec.id)?;
        let model = match InMemoryModel::from_word2vec_files(
            spec.id.clone(),
            &spec.words,
            spec.keys.as_deref(),
        ) {
            Ok(model) => model,
            Err(e) => {
                problems += 1;
                println!("{} {}: {}", "FAIL".red().bold(), spec.id, e);
                continue;
            }
        };

        let missing = missing_vocabulary(&model, set);
        if missing.is_empty() {
            println!(
                "{} {} uses '{}' ({} pairs, {} words, {} keys)",
                "OK".green().bold(),
                spec.id,
                set.name,
                set.len(),
                model.vocabulary_len(),
                model.key_len()
            );
        } else {
            problems += 1;
            println!(
                "{} {} lacks {} word(s) of '{}':",
                "FAIL".red().bold(),
                spec.id,
                missing.len(),
                set.name
            );
            for word in &missing {
                let pair = &set.pairs[word.pair_index];
                println!(
                    "    {} {}",
                    word.word.yellow(),
                    format!("(pair {}: {} / {})", word.pair_index, pair.positive, pair.negative)
                        .dimmed()
                );
            }
        }
    }

    if problems > 0 {
        bail!("{problems} model(s) failed validation");
    }
    Ok(())
}

/// Project words onto an axis
fn run_words(
    model: PathBuf,
    pairs: PathBuf,
    words: Vec<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let model = load_model(&model, None)?;
    let set = load_pairs(&pairs)?;
    let words = (!words.is_empty()).then_some(words.as_slice());
    let result = project_words(&model, &set, words)?;
    emit(&result, output.as_deref())
}

/// Project entity keys onto an axis
fn run_indicators(
    model: PathBuf,
    keys_model: PathBuf,
    pairs: PathBuf,
    keys: Vec<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let model = load_model(&model, Some(&keys_model))?;
    let set = load_pairs(&pairs)?;
    let result = project_indicators(&model, &set, &keys)?;
    emit(&result, output.as_deref())
}

/// Discover pole vocabulary
fn run_poles(
    model: PathBuf,
    pairs: PathBuf,
    top_n: usize,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let model = load_model(&model, None)?;
    let set = load_pairs(&pairs)?;
    let result = discover_poles(&model, &set, top_n)?;
    if result.is_empty() && output.is_none() {
        println!("{}", "No pole vocabulary beyond the seed words.".dimmed());
        return Ok(());
    }
    emit(&result, output.as_deref())
}

/// Print a stored table
fn run_show(file: PathBuf, ranked: bool) -> anyhow::Result<()> {
    let result = read_projection_csv(&file)?;
    println!("{}", format!("=== {} ===", file.display()).cyan().bold());
    print_table(&result, ranked);
    if let Some(mean) = result.mean() {
        println!();
        println!("{}: {} rows, mean {:+.4}", "Summary".white().bold(), result.len(), mean);
    }
    Ok(())
}

fn load_model(words: &Path, keys: Option<&Path>) -> anyhow::Result<InMemoryModel> {
    let id = words
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string();
    let model = InMemoryModel::from_word2vec_files(id, words, keys)
        .with_context(|| format!("Failed to load model {}", words.display()))?;
    tracing::debug!(model = %model.id(), dimensions = model.dimensions(), "Model ready");
    Ok(model)
}

fn load_pairs(path: &Path) -> anyhow::Result<DimensionSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pair list {}", path.display()))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dimension");
    let set = DimensionSet::parse_pairs(name, &text)
        .with_context(|| format!("Invalid pair list {}", path.display()))?;
    if set.is_empty() {
        bail!("Pair list {} contains no pairs", path.display());
    }
    Ok(set)
}

/// Write to CSV when an output path is given, otherwise print
fn emit(result: &ProjectionResult, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            write_projection_csv(path, result)?;
            println!(
                "{} {} rows to {}",
                "Wrote".green().bold(),
                result.len(),
                path.display()
            );
        }
        None => print_table(result, false),
    }
    Ok(())
}

fn print_table(result: &ProjectionResult, ranked: bool) {
    let rows = if ranked {
        result.ranked()
    } else {
        result.rows.iter().collect()
    };
    let width = rows
        .iter()
        .map(|r| r.entity.chars().count())
        .max()
        .unwrap_or(0)
        .max(result.kind.column().len());

    println!(
        "  {:width$}  {:>9}",
        result.kind.column().white().bold(),
        "similarity".white().bold(),
    );
    for row in rows {
        let score = format!("{:+.4}", row.similarity);
        let score = if row.similarity >= 0.0 {
            score.green()
        } else {
            score.red()
        };
        println!("  {:width$}  {:>9}  {}", row.entity, score, bar(row.similarity));
    }
}

/// Signed bar centred on zero
fn bar(similarity: f32) -> String {
    const HALF: usize = 15;
    let filled = ((similarity.abs().min(1.0) * HALF as f32).round()) as usize;
    let (left, right) = if similarity < 0.0 {
        (
            format!("{}{}", " ".repeat(HALF - filled), "#".repeat(filled)),
            " ".repeat(HALF),
        )
    } else {
        (
            " ".repeat(HALF),
            format!("{}{}", "#".repeat(filled), " ".repeat(HALF - filled)),
        )
    };
    format!("{}|{}", left.red(), right.green())
}
