//! Projection Table Persistence
//!
//! Two-column CSV files: `indicator,similarity` or `word,similarity`, one
//! row per entity in table order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::projection::{EntityKind, ProjectionResult, ProjectionRow};

/// CSV persistence errors
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Directory creation or file access failed
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
    /// CSV encoding/decoding failed
    #[error("CSV error on {path}: {source}")]
    Csv {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: csv::Error,
    },
    /// Header is neither `indicator,similarity` nor `word,similarity`
    #[error("Unrecognised projection header in {path}: {header}")]
    Header {
        /// Path being read
        path: PathBuf,
        /// Header found
        header: String,
    },
}

/// Write a projection table to any writer
pub fn write_projection<W: io::Write>(writer: W, result: &ProjectionResult) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([result.kind.column(), "similarity"])?;
    for row in &result.rows {
        wtr.write_record([row.entity.as_str(), row.similarity.to_string().as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a projection table to `path`, creating parent directories
pub fn write_projection_csv(path: &Path, result: &ProjectionResult) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = fs::File::create(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_projection(io::BufWriter::new(file), result).map_err(|source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a projection table written by [`write_projection_csv`]
pub fn read_projection_csv(path: &Path) -> Result<ProjectionResult, StoreError> {
    let csv_err = |source: csv::Error| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = csv::Reader::from_path(path).map_err(csv_err)?;

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let kind = match headers.iter().collect::<Vec<_>>().as_slice() {
        ["indicator", "similarity"] => EntityKind::Indicator,
        ["word", "similarity"] => EntityKind::Word,
        _ => {
            return Err(StoreError::Header {
                path: path.to_path_buf(),
                header: headers.iter().collect::<Vec<_>>().join(","),
            });
        }
    };

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let (entity, similarity) = record
            .deserialize::<(String, f32)>(None)
            .map_err(csv_err)?;
        rows.push(ProjectionRow { entity, similarity });
    }

    Ok(ProjectionResult { kind, rows })
}
