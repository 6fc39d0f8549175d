//! word2vec Text Format Loader
//!
//! Trained models are exchanged as plain word2vec text files:
//!
//! ```text
//! 3 4
//! universitet 0.12 -0.40 0.03 0.88
//! erhvervsskole -0.31 0.22 0.10 -0.05
//! ...
//! ```
//!
//! The `<count> <dimensions>` header is optional. Doc2vec document vectors use
//! the same layout with entity keys in place of words.

use std::fs;
use std::path::{Path, PathBuf};

use super::memory::InMemoryModel;
use super::model::EmbeddingModel;
use crate::error::ProjectionError;

/// Model file loading errors
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// A row could not be parsed
    #[error("{path}:{line}: {message}")]
    Malformed {
        /// File being parsed
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },
    /// File had no vectors
    #[error("{0} contains no vectors")]
    Empty(PathBuf),
    /// A row was rejected by the model
    #[error("Invalid model data: {0}")]
    Model(#[from] ProjectionError),
    /// Word and key files disagree on dimension
    #[error("Dimension mismatch between vocabulary ({words}) and entity keys ({keys})")]
    DimensionMismatch {
        /// Vocabulary dimension
        words: usize,
        /// Entity-key dimension
        keys: usize,
    },
}

/// A parsed word2vec file
#[derive(Debug, Clone)]
pub struct VectorFile {
    /// Vector length shared by every row
    pub dimensions: usize,
    /// `(token, vector)` rows in file order
    pub rows: Vec<(String, Vec<f32>)>,
}

/// Parse word2vec text content; `path` is only used in error messages
pub fn parse_word2vec_text(path: &Path, content: &str) -> Result<VectorFile, LoadError> {
    let malformed = |line: usize, message: String| LoadError::Malformed {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut dimensions: Option<usize> = None;
    let mut declared_count: Option<usize> = None;
    let mut rows = Vec::new();

    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(token) = fields.next() else {
            continue;
        };
        let rest: Vec<&str> = fields.collect();

        // Header: exactly two integers on the first non-empty line
        if rows.is_empty() && dimensions.is_none() && rest.len() == 1 {
            let count = token.parse::<usize>();
            let dims = rest[0].parse::<usize>();
            if let (Ok(count), Ok(dims)) = (count, dims) {
                if dims == 0 {
                    return Err(malformed(line_no, "header declares zero dimensions".into()));
                }
                declared_count = Some(count);
                dimensions = Some(dims);
                continue;
            }
        }

        let mut vector = Vec::with_capacity(rest.len());
        for field in &rest {
            let value = field
                .parse::<f32>()
                .map_err(|_| malformed(line_no, format!("invalid float '{field}' for '{token}'")))?;
            vector.push(value);
        }

        match dimensions {
            Some(d) if d != vector.len() => {
                return Err(malformed(
                    line_no,
                    format!("'{token}' has {} components, expected {d}", vector.len()),
                ));
            }
            None if vector.is_empty() => {
                return Err(malformed(line_no, format!("'{token}' has no components")));
            }
            None => dimensions = Some(vector.len()),
            _ => {}
        }

        rows.push((token.to_string(), vector));
    }

    let Some(dimensions) = dimensions else {
        return Err(LoadError::Empty(path.to_path_buf()));
    };
    if rows.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }
    if let Some(count) = declared_count
        && count != rows.len()
    {
        tracing::warn!(
            path = %path.display(),
            declared = count,
            found = rows.len(),
            "word2vec header count does not match row count"
        );
    }

    Ok(VectorFile { dimensions, rows })
}

/// Read and parse a word2vec text file
pub fn load_word2vec_text(path: &Path) -> Result<VectorFile, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_word2vec_text(path, &content)
}

impl InMemoryModel {
    /// Build a model from a vocabulary file and an optional entity-key file
    pub fn from_word2vec_files(
        id: impl Into<String>,
        words: &Path,
        keys: Option<&Path>,
    ) -> Result<Self, LoadError> {
        let id = id.into();
        let word_file = load_word2vec_text(words)?;
        let key_file = keys.map(load_word2vec_text).transpose()?;

        if let Some(key_file) = &key_file
            && key_file.dimensions != word_file.dimensions
        {
            return Err(LoadError::DimensionMismatch {
                words: word_file.dimensions,
                keys: key_file.dimensions,
            });
        }

        let mut model = InMemoryModel::new(id, word_file.dimensions);
        for (word, vector) in word_file.rows {
            model.insert_word(word, vector)?;
        }
        for (key, vector) in key_file.into_iter().flat_map(|f| f.rows) {
            model.insert_key(key, vector)?;
        }

        tracing::info!(
            model = %model.id(),
            dimensions = model.dimensions(),
            vocabulary = model.vocabulary_len(),
            keys = model.key_len(),
            "Loaded embedding model"
        );
        Ok(model)
    }
}

// ============================================================================
// TESTS
// ============================================================================
