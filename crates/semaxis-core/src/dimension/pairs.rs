//! Word Pairs and Dimension Sets
//!
//! A dimension set is an ordered list of contrastive pairs, each sampling the
//! same semantic opposition ("universitet" vs "erhvervsskole", ...). Order is
//! kept everywhere since flattened word lists and reports follow it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One contrastive sample: the positive pole word and its negative counterpart
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct WordPair {
    /// Word at the positive end of the axis
    pub positive: String,
    /// Word at the negative end of the axis
    pub negative: String,
}

impl WordPair {
    /// Create a pair
    pub fn new(positive: impl Into<String>, negative: impl Into<String>) -> Self {
        Self {
            positive: positive.into(),
            negative: negative.into(),
        }
    }
}

impl From<(String, String)> for WordPair {
    fn from((positive, negative): (String, String)) -> Self {
        Self { positive, negative }
    }
}

impl From<WordPair> for (String, String) {
    fn from(pair: WordPair) -> Self {
        (pair.positive, pair.negative)
    }
}

impl<'a> From<(&'a str, &'a str)> for WordPair {
    fn from((positive, negative): (&'a str, &'a str)) -> Self {
        Self::new(positive, negative)
    }
}

/// Error parsing a plain-text pair list
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: expected '<positive> <negative>', got '{content}'")]
pub struct PairParseError {
    /// 1-based line number
    pub line: usize,
    /// Offending line
    pub content: String,
}

/// A named, ordered sequence of word pairs defining one semantic axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSet {
    /// Name used in configs and reports
    pub name: String,
    /// Pairs in declaration order
    pub pairs: Vec<WordPair>,
}

impl DimensionSet {
    /// Create a dimension set from anything convertible to pairs
    pub fn new<I, P>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<WordPair>,
    {
        Self {
            name: name.into(),
            pairs: pairs.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when there are no pairs
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// All words flattened in declaration order, positive before negative,
    /// duplicates retained
    pub fn words(&self) -> Vec<&str> {
        self.pairs
            .iter()
            .flat_map(|p| [p.positive.as_str(), p.negative.as_str()])
            .collect()
    }

    /// Distinct words used by the set
    pub fn vocabulary(&self) -> HashSet<&str> {
        self.words().into_iter().collect()
    }

    /// Parse a plain-text pair list
    ///
    /// One pair per line, words separated by whitespace. Blank lines and
    /// `#` comments are ignored.
    pub fn parse_pairs(name: impl Into<String>, text: &str) -> Result<Self, PairParseError> {
        let mut pairs = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [positive, negative] => pairs.push(WordPair::new(*positive, *negative)),
                _ => {
                    return Err(PairParseError {
                        line: i + 1,
                        content: raw.to_string(),
                    });
                }
            }
        }
        Ok(Self {
            name: name.into(),
            pairs,
        })
    }
}
