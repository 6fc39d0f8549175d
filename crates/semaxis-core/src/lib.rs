//! # Semaxis Core
//!
//! Semantic dimension and projection engine for trained embedding models.
//!
//! A semantic dimension is defined by pairs of antonymous seed words
//! (`universitet` / `erhvervsskole`, `forsker` / `håndværker`, ...). The
//! engine turns those pairs into a direction vector inside a model's
//! embedding space and measures where documents, speakers, parties or
//! vocabulary fall along it:
//!
//! - **Direction Vectors**: mean of `vec(positive) − vec(negative)` over all pairs
//! - **Indicator Projection**: cosine of entity embeddings (doc2vec tags) to the axis
//! - **Word Projection**: cosine of vocabulary words to the axis
//! - **Pole Discovery**: vocabulary closest to each end of the axis, seeds excluded
//! - **Per-Model Dimension Sets**: substitute pairs a model cannot represent
//! - **Studies**: batch projection across many models, written as CSV tables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use semaxis_core::{DimensionSet, InMemoryModel, project_words};
//!
//! let model = InMemoryModel::new("toy", 2)
//!     .with_word("a", vec![1.0, 0.0])?
//!     .with_word("b", vec![0.0, 1.0])?
//!     .with_word("c", vec![-1.0, 0.0])?;
//!
//! let set = DimensionSet::new("ac", [("a", "c")]);
//! let table = project_words(&model, &set, Some(&["a", "c", "b"][..]))?;
//! assert_eq!(table.similarities(), vec![1.0, -1.0, 0.0]);
//! ```
//!
//! Every projection rebuilds its direction from the model and set it is
//! given; models are read-only and can be shared across threads.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod dimension;
pub mod embeddings;
pub mod error;
pub mod projection;
pub mod store;

/// Batch studies across many models
pub mod study;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use error::{KeySpace, ProjectionError, Result};

pub use embeddings::{
    cosine_similarity, load_word2vec_text, EmbeddingModel, InMemoryModel, LoadError,
};

pub use dimension::{
    build_direction, missing_vocabulary, DimensionResolver, DimensionSet, DirectionVector,
    MissingWord, ResolveError, WordPair,
};

pub use projection::{
    discover_poles, project_indicators, project_words, EntityKind, ProjectionResult,
    ProjectionRow,
};

pub use store::{read_projection_csv, write_projection_csv, StoreError};

pub use study::{run_study, StudyConfig, StudyError, StudyReport};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenience imports for common use
pub mod prelude {
    pub use crate::{
        discover_poles, project_indicators, project_words, DimensionSet, EmbeddingModel,
        InMemoryModel, ProjectionError, ProjectionResult,
    };
}
