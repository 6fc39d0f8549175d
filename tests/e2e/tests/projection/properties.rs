//! Projection Properties
//!
//! Behaviour that must hold for any model and any well-formed dimension set:
//! axis sign, default word lists, score range, row order and pole exclusion.

use semaxis_core::{
    build_direction, discover_poles, project_indicators, project_words, DimensionSet,
    EntityKind, InMemoryModel,
};
use semaxis_e2e_tests::{ModelFactory, SetFactory};

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}

fn positives(set: &DimensionSet) -> Vec<&str> {
    set.pairs.iter().map(|p| p.positive.as_str()).collect()
}

fn negatives(set: &DimensionSet) -> Vec<&str> {
    set.pairs.iter().map(|p| p.negative.as_str()).collect()
}

fn assert_sign_consistent(model: &InMemoryModel, set: &DimensionSet) {
    let pos = project_words(model, set, Some(positives(set).as_slice())).unwrap();
    let neg = project_words(model, set, Some(negatives(set).as_slice())).unwrap();
    assert!(
        mean(&pos.similarities()) > mean(&neg.similarities()),
        "positive pole should score above negative pole for {}",
        set.name
    );
}

// ============================================================================
// SIGN CONSISTENCY
// ============================================================================

#[test]
fn test_sign_consistency_compass() {
    let model = ModelFactory::compass();
    assert_sign_consistent(&model, &SetFactory::compass_horizontal());
    assert_sign_consistent(&model, &SetFactory::compass_two_pairs());
}

#[test]
fn test_sign_consistency_education() {
    let model = ModelFactory::education("model_1");
    assert_sign_consistent(&model, &SetFactory::education());
    assert_sign_consistent(&model, &SetFactory::education_reduced());
}

#[test]
fn test_sign_consistency_every_synthetic_pair() {
    let model = ModelFactory::synthetic("synthetic", 40, 0, 16);
    for i in 0..20 {
        let set = DimensionSet::new(
            format!("pair_{i}"),
            [(format!("word_{}", 2 * i), format!("word_{}", 2 * i + 1))],
        );
        assert_sign_consistent(&model, &set);
    }
}

#[test]
fn test_flipping_pairs_flips_every_score() {
    let model = ModelFactory::education("model_1");
    let set = SetFactory::education();
    let flipped = DimensionSet::new(
        "flipped",
        set.pairs
            .iter()
            .map(|p| (p.negative.clone(), p.positive.clone())),
    );

    let keys = ModelFactory::education_keys();
    let forward = project_indicators(&model, &set, &keys).unwrap();
    let backward = project_indicators(&model, &flipped, &keys).unwrap();
    for (f, b) in forward.rows.iter().zip(&backward.rows) {
        assert!((f.similarity + b.similarity).abs() < 1e-6);
    }
}

// ============================================================================
// DEFAULT WORD LIST
// ============================================================================

#[test]
fn test_default_words_are_flattened_pairs() {
    let model = ModelFactory::education("model_1");
    let set = SetFactory::education();
    let result = project_words::<_, &str>(&model, &set, None).unwrap();
    assert_eq!(
        result.entities(),
        vec!["universitet", "erhvervsskole", "forsker", "håndværker"]
    );
    // Seed pairs separate cleanly
    for (i, score) in result.similarities().into_iter().enumerate() {
        if i % 2 == 0 {
            assert!(score > 0.5, "positive seed scored {score}");
        } else {
            assert!(score < -0.5, "negative seed scored {score}");
        }
    }
}

// ============================================================================
// RANGE
// ============================================================================

#[test]
fn test_scores_stay_within_unit_range() {
    let model = ModelFactory::synthetic("synthetic", 300, 100, 24);
    let set = SetFactory::synthetic(5);

    let words: Vec<String> = model.vocabulary().map(str::to_string).collect();
    let keys: Vec<String> = model.keys().map(str::to_string).collect();

    let by_word = project_words(&model, &set, Some(words.as_slice())).unwrap();
    let by_key = project_indicators(&model, &set, &keys).unwrap();
    let poles = discover_poles(&model, &set, 25).unwrap();

    for score in by_word
        .similarities()
        .into_iter()
        .chain(by_key.similarities())
        .chain(poles.similarities())
    {
        assert!((-1.0..=1.0).contains(&score), "score {score} out of range");
    }
}

#[test]
fn test_scaled_vectors_score_identically() {
    let mut model = InMemoryModel::new("scaled", 2);
    model.insert_word("a", vec![1.0, 0.0]).unwrap();
    model.insert_word("c", vec![-1.0, 0.0]).unwrap();
    model.insert_key("small", vec![0.001, 0.001]).unwrap();
    model.insert_key("large", vec![1000.0, 1000.0]).unwrap();

    let set = SetFactory::compass_horizontal();
    let result = project_indicators(&model, &set, &["small", "large"]).unwrap();
    assert!((result.rows[0].similarity - result.rows[1].similarity).abs() < 1e-6);
    assert!((result.rows[0].similarity - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
}

// ============================================================================
// ORDER
// ============================================================================

#[test]
fn test_row_order_follows_input() {
    let model = ModelFactory::compass();
    let set = SetFactory::compass_horizontal();

    let keys = ["doc_west", "doc_east", "doc_north"];
    let result = project_indicators(&model, &set, &keys).unwrap();
    assert_eq!(result.kind, EntityKind::Indicator);
    assert_eq!(result.entities(), keys.to_vec());

    let words = ["b", "west", "a", "east", "c"];
    let result = project_words(&model, &set, Some(&words[..])).unwrap();
    assert_eq!(result.kind, EntityKind::Word);
    assert_eq!(result.entities(), words.to_vec());
}

#[test]
fn test_repeated_inputs_are_kept() {
    let model = ModelFactory::compass();
    let set = SetFactory::compass_horizontal();
    let result = project_indicators(&model, &set, &["doc_east", "doc_east"]).unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result.rows[0], result.rows[1]);
}

// ============================================================================
// POLES
// ============================================================================

#[test]
fn test_poles_exclude_seed_words() {
    let model = ModelFactory::synthetic("synthetic", 200, 0, 16);
    let set = SetFactory::synthetic(3);
    let seeds = set.vocabulary();

    for top_n in [1, 5, 20, 1_000] {
        let result = discover_poles(&model, &set, top_n).unwrap();
        assert!(result.entities().iter().all(|w| !seeds.contains(w)));
        assert!(result.len() <= 2 * top_n);
    }
}

#[test]
fn test_poles_cover_vocabulary_once_when_top_n_is_large() {
    let model = ModelFactory::synthetic("synthetic", 200, 0, 16);
    let set = SetFactory::synthetic(3);

    let result = discover_poles(&model, &set, 1_000).unwrap();
    assert_eq!(result.len(), 200 - 6);

    // Low pole listed first, so scores never decrease
    for pair in result.rows.windows(2) {
        assert!(pair[0].similarity <= pair[1].similarity + 1e-5);
    }
}

#[test]
fn test_education_poles() {
    let model = ModelFactory::education("model_1");
    let set = SetFactory::education();

    let result = discover_poles(&model, &set, 2).unwrap();
    // Nearest non-seed words at each end
    assert_eq!(result.entities(), vec!["lærling", "akademisk"]);
    assert!(result.rows[0].similarity < 0.0);
    assert!(result.rows[1].similarity > 0.0);
}

#[test]
fn test_direction_is_recomputed_per_call() {
    let model = ModelFactory::education("model_1");
    let full = build_direction(&model, &SetFactory::education()).unwrap();
    let reduced = build_direction(&model, &SetFactory::education_reduced()).unwrap();
    assert_ne!(full, reduced);

    let keys = ModelFactory::education_keys();
    let a = project_indicators(&model, &SetFactory::education(), &keys).unwrap();
    let _ = project_indicators(&model, &SetFactory::education_reduced(), &keys).unwrap();
    let b = project_indicators(&model, &SetFactory::education(), &keys).unwrap();
    assert_eq!(a, b);
}
