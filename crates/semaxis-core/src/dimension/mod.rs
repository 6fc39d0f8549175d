//! Dimension Module
//!
//! Turns contrastive word pairs into a semantic axis:
//! - `WordPair` / `DimensionSet` definitions and plain-text parsing
//! - `build_direction`: mean of per-pair difference vectors
//! - `DimensionResolver`: which set each model supports, validated up front

mod builder;
mod pairs;
mod resolver;

pub use builder::{build_direction, missing_vocabulary, DirectionVector, MissingWord};
pub use pairs::{DimensionSet, PairParseError, WordPair};
pub use resolver::{DimensionResolver, ResolveError};
