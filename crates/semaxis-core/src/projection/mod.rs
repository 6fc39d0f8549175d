//! Projection Module
//!
//! Places entities and words on a semantic axis by cosine similarity, and
//! finds the vocabulary living at each pole.

mod engine;
mod result;

pub use engine::{discover_poles, project_indicators, project_words};
pub use result::{EntityKind, ProjectionResult, ProjectionRow};
