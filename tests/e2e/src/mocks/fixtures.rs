//! Test Data Factory
//!
//! Deterministic embedding models small enough to reason about by hand:
//! - A 2-d "compass" model where every cosine is easy to compute
//! - A 4-d education model whose first axis separates academic from
//!   vocational vocabulary, with party-year document tags
//! - Synthetic models of arbitrary size for stress tests

use semaxis_core::{DimensionSet, InMemoryModel};

/// Academic / vocational vocabulary for the education model
///
/// The first component carries the opposition; the others add noise that
/// cancels out inside each pair.
const EDUCATION_WORDS: &[(&str, [f32; 4])] = &[
    ("universitet", [1.0, 0.2, 0.0, 0.0]),
    ("erhvervsskole", [-1.0, 0.2, 0.0, 0.0]),
    ("forsker", [0.9, 0.0, 0.3, 0.0]),
    ("håndværker", [-0.9, 0.0, 0.3, 0.0]),
    ("boglig", [0.8, 0.1, 0.0, 0.2]),
    ("praktisk", [-0.8, 0.1, 0.0, 0.2]),
    ("akademisk", [0.95, 0.1, 0.1, 0.0]),
    ("lærling", [-0.9, 0.1, 0.1, 0.1]),
    ("bord", [0.0, 1.0, 0.0, 0.0]),
    ("vejr", [0.0, 0.0, 1.0, 0.0]),
    ("hus", [0.0, 0.0, 0.0, 1.0]),
];

/// Party-year document tags for the education model
const EDUCATION_KEYS: &[(&str, [f32; 4])] = &[
    ("S_2019_Venstre", [0.6, 0.3, 0.2, 0.1]),
    ("S_2019_Dansk_Folkeparti", [-0.5, 0.3, 0.2, 0.1]),
    ("S_2019_Alternativet", [0.0, 1.0, 1.0, 0.0]),
];

/// Factory for toy embedding models
pub struct ModelFactory;

impl ModelFactory {
    /// 2-d model: `a`, `b`, `c`, `d` on the unit axes plus `east` / `west`
    /// near the horizontal poles, and three document tags
    pub fn compass() -> InMemoryModel {
        let words: [(&str, [f32; 2]); 6] = [
            ("a", [1.0, 0.0]),
            ("b", [0.0, 1.0]),
            ("c", [-1.0, 0.0]),
            ("d", [0.0, -1.0]),
            ("east", [0.9, 0.2]),
            ("west", [-0.8, 0.1]),
        ];
        let keys: [(&str, [f32; 2]); 3] = [
            ("doc_east", [3.0, 0.5]),
            ("doc_north", [0.0, 2.0]),
            ("doc_west", [-2.0, -0.1]),
        ];

        let mut model = InMemoryModel::new("compass", 2);
        for (word, v) in words {
            model.insert_word(word, v.to_vec()).expect("compass word");
        }
        for (key, v) in keys {
            model.insert_key(key, v.to_vec()).expect("compass key");
        }
        model
    }

    /// 4-d education model with the full vocabulary
    pub fn education(id: &str) -> InMemoryModel {
        Self::education_without(id, &[])
    }

    /// 4-d education model with some vocabulary removed
    pub fn education_without(id: &str, absent: &[&str]) -> InMemoryModel {
        let mut model = InMemoryModel::new(id, 4);
        for (word, v) in EDUCATION_WORDS {
            if !absent.contains(word) {
                model.insert_word(*word, v.to_vec()).expect("education word");
            }
        }
        for (key, v) in EDUCATION_KEYS {
            model.insert_key(*key, v.to_vec()).expect("education key");
        }
        model
    }

    /// Document tags of the education model, in declaration order
    pub fn education_keys() -> Vec<String> {
        EDUCATION_KEYS.iter().map(|(k, _)| k.to_string()).collect()
    }

    /// Deterministic pseudo-random model with `word_i` / `doc_i` labels
    pub fn synthetic(id: &str, words: usize, keys: usize, dimensions: usize) -> InMemoryModel {
        let vector = |seed: usize| -> Vec<f32> {
            (0..dimensions)
                .map(|j| ((seed * dimensions + j) as f32 * 0.731).sin())
                .collect()
        };
        let mut model = InMemoryModel::new(id, dimensions);
        for i in 0..words {
            model
                .insert_word(format!("word_{i}"), vector(i))
                .expect("synthetic word");
        }
        for i in 0..keys {
            model
                .insert_key(format!("doc_{i}"), vector(words + i))
                .expect("synthetic key");
        }
        model
    }
}

/// Factory for dimension sets matching the toy models
pub struct SetFactory;

impl SetFactory {
    /// Horizontal axis of the compass model
    pub fn compass_horizontal() -> DimensionSet {
        DimensionSet::new("horizontal", [("a", "c")])
    }

    /// Horizontal axis sampled twice
    pub fn compass_two_pairs() -> DimensionSet {
        DimensionSet::new("horizontal2", [("a", "c"), ("east", "west")])
    }

    /// Full education axis
    pub fn education() -> DimensionSet {
        DimensionSet::new(
            "education",
            [("universitet", "erhvervsskole"), ("forsker", "håndværker")],
        )
    }

    /// Education axis for models lacking `forsker` / `håndværker`
    pub fn education_reduced() -> DimensionSet {
        DimensionSet::new(
            "education_reduced",
            [("universitet", "erhvervsskole"), ("boglig", "praktisk")],
        )
    }

    /// Synthetic axis over the first `pairs * 2` synthetic words
    pub fn synthetic(pairs: usize) -> DimensionSet {
        DimensionSet::new(
            "synthetic",
            (0..pairs).map(|i| (format!("word_{}", 2 * i), format!("word_{}", 2 * i + 1))),
        )
    }
}
