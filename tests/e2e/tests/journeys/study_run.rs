//! Study Run Journey
//!
//! Write models and a config to disk, run the study, then read back every
//! table and the manifest the way a downstream analysis would.

use semaxis_core::study::{JobKind, JobStatus, StudyReport, MANIFEST_FILE};
use semaxis_core::{run_study, EntityKind};
use semaxis_e2e_tests::{ModelFactory, StudyWorkspace};
use serde_json::json;

fn education_study(ws: &StudyWorkspace) -> semaxis_core::StudyConfig {
    let (words_1, keys_1) = ws.write_model(&ModelFactory::education("model_1"));
    let (words_2, keys_2) = ws.write_model(&ModelFactory::education("model_2"));
    ws.write_file("party_year.txt", "S_2019_Dansk_Folkeparti\nS_2019_Venstre\n");

    ws.write_config(json!({
        "models": [
            { "id": "model_1", "words": words_1, "keys": keys_1 },
            { "id": "model_2", "words": words_2, "keys": keys_2 }
        ],
        "dimension_sets": {
            "education": [["universitet", "erhvervsskole"], ["forsker", "håndværker"]]
        },
        "indicator_groups": [
            { "title": "party_year_embeddings", "keys_file": "party_year.txt" },
            { "title": "all_documents", "keys": ["S_2019_Alternativet", "S_2019_Venstre"], "keys_file": "party_year.txt" }
        ],
        "top_n": 3,
        "probe_words": ["akademisk", "lærling", "bord"],
        "output_dir": "out"
    }))
}

#[tokio::test]
async fn test_full_study_writes_every_table() {
    let ws = StudyWorkspace::new();
    let config = education_study(&ws);
    assert_eq!(config.output_dir(), ws.output_dir());

    let report = run_study(&config, &config.output_dir()).await.unwrap();
    assert!(report.is_success(), "failures: {:?}", report.failed().collect::<Vec<_>>());
    assert_eq!(report.jobs.len(), 2 * 4);

    for model in ["model_1", "model_2"] {
        for stem in [
            "party_year_embeddings",
            "all_documents",
            "top_words",
            "word_pair_projection",
        ] {
            assert!(ws.table_path(model, stem).exists(), "{model}/{stem}.csv");
        }
    }
    assert!(ws.output_dir().join(MANIFEST_FILE).exists());
}

#[tokio::test]
async fn test_indicator_tables_keep_key_order_and_sign() {
    let ws = StudyWorkspace::new();
    let config = education_study(&ws);
    run_study(&config, &ws.output_dir()).await.unwrap();

    let table = ws.table("model_1", "party_year_embeddings");
    assert_eq!(table.kind, EntityKind::Indicator);
    assert_eq!(
        table.entities(),
        vec!["S_2019_Dansk_Folkeparti", "S_2019_Venstre"]
    );
    assert!(table.get("S_2019_Dansk_Folkeparti").unwrap() < 0.0);
    assert!(table.get("S_2019_Venstre").unwrap() > 0.0);

    // Inline keys first, file keys appended, repeats dropped
    let merged = ws.table("model_1", "all_documents");
    assert_eq!(
        merged.entities(),
        vec![
            "S_2019_Alternativet",
            "S_2019_Venstre",
            "S_2019_Dansk_Folkeparti"
        ]
    );
    assert!(merged.get("S_2019_Alternativet").unwrap().abs() < 1e-6);
}

#[tokio::test]
async fn test_word_tables() {
    let ws = StudyWorkspace::new();
    let config = education_study(&ws);
    run_study(&config, &ws.output_dir()).await.unwrap();

    let probes = ws.table("model_2", "word_pair_projection");
    assert_eq!(probes.kind, EntityKind::Word);
    assert_eq!(probes.entities(), vec!["akademisk", "lærling", "bord"]);

    let poles = ws.table("model_2", "top_words");
    let seeds = ["universitet", "erhvervsskole", "forsker", "håndværker"];
    assert!(poles.entities().iter().all(|w| !seeds.contains(w)));
    assert_eq!(poles.rows.first().unwrap().entity, "lærling");
}

#[tokio::test]
async fn test_manifest_matches_report() {
    let ws = StudyWorkspace::new();
    let config = education_study(&ws);
    let report = run_study(&config, &ws.output_dir()).await.unwrap();

    let manifest = StudyReport::read_manifest(&ws.output_dir().join(MANIFEST_FILE)).unwrap();
    assert_eq!(manifest, report);
    assert!(manifest.finished_at >= manifest.started_at);

    let outcome = manifest
        .find(
            "model_1",
            &JobKind::Indicators {
                group: "party_year_embeddings".into(),
            },
        )
        .unwrap();
    assert_eq!(outcome.dimension_set.as_deref(), Some("education"));
    match &outcome.status {
        JobStatus::Succeeded { rows, output } => {
            assert_eq!(*rows, 2);
            assert_eq!(output, &ws.table_path("model_1", "party_year_embeddings"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_separate_runs_get_distinct_ids() {
    let ws = StudyWorkspace::new();
    let config = education_study(&ws);
    let first = run_study(&config, &ws.output_dir()).await.unwrap();
    let second = run_study(&config, &ws.output_dir()).await.unwrap();
    assert_ne!(first.run_id, second.run_id);
}

#[tokio::test]
async fn test_serial_and_parallel_runs_agree() {
    let ws = StudyWorkspace::new();
    let mut config = education_study(&ws);

    config.max_concurrent_jobs = Some(1);
    let serial_dir = ws.root().join("serial");
    run_study(&config, &serial_dir).await.unwrap();

    config.max_concurrent_jobs = Some(8);
    let parallel_dir = ws.root().join("parallel");
    run_study(&config, &parallel_dir).await.unwrap();

    for stem in ["party_year_embeddings", "top_words", "word_pair_projection"] {
        let a = std::fs::read_to_string(serial_dir.join("model_1").join(format!("{stem}.csv")))
            .unwrap();
        let b = std::fs::read_to_string(parallel_dir.join("model_1").join(format!("{stem}.csv")))
            .unwrap();
        assert_eq!(a, b, "{stem}");
    }
}
