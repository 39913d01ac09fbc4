use std::fs;
use std::path::Path;

use assert_cmd::Command;
use dealsmith_run::config::RunConfig;
use dealsmith_run::runner::GenerationRunner;
use predicates::prelude::*;
use tempfile::tempdir;

const PROFILE_JSON: &str = r#"{
    "name": "smoke",
    "seats": {
        "N": { "subprofiles": [ { "standard": { "total_min_hcp": 11 } } ] },
        "E": { "subprofiles": [ { } ] },
        "S": { "subprofiles": [ { }, { } ] },
        "W": { "subprofiles": [ { } ] }
    }
}"#;

fn write_config(dir: &Path) -> (RunConfig, std::path::PathBuf) {
    let profile_path = dir.join("profile.json");
    fs::write(&profile_path, PROFILE_JSON).expect("profile written");

    let config_path = dir.join("run.yaml");
    let yaml = format!(
        r#"
run_id: "test_smoke"
profile: "{profile}"
boards:
  seed: 4242
  count: 8
  max_attempts: 100
outputs:
  deals_jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        profile = profile_path.display(),
        jsonl = dir.join("deals.jsonl").display(),
        summary = dir.join("summary.md").display()
    );
    fs::write(&config_path, yaml).expect("config written");

    let mut cfg = RunConfig::from_path(&config_path).expect("config loads");
    cfg.validate().expect("config validates");
    (cfg, config_path)
}

fn rank_count(notation: &str) -> usize {
    notation.chars().filter(|c| *c != '.').count()
}

#[test]
fn run_produces_rows_and_summary() {
    let dir = tempdir().expect("temp dir");
    let (config, _) = write_config(dir.path());
    let outputs = config.resolved_outputs();

    let runner = GenerationRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("run completes");

    assert_eq!(summary.boards_requested, 8);
    assert_eq!(summary.rows_written, 8);
    assert_eq!(summary.boards_dealt + summary.boards_failed, 8);

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let mut boards_seen = 0;
    for line in jsonl.lines() {
        let row: serde_json::Value = serde_json::from_str(line).expect("row decodes");
        boards_seen += 1;
        assert_eq!(row["board"], boards_seen);
        if row["success"].as_bool().unwrap() {
            let hands = row["hands"].as_object().expect("hands present");
            for seat_key in ["n", "e", "s", "w"] {
                let notation = hands[seat_key].as_str().unwrap();
                assert_eq!(rank_count(notation), 13, "seat {seat_key}: {notation}");
            }
        }
    }
    assert_eq!(boards_seen, 8);

    let summary_md = fs::read_to_string(&summary.summary_path).expect("summary readable");
    assert!(summary_md.contains("Deal Generation Summary"));
    assert!(summary_md.contains("| North |"));
}

#[test]
fn identical_seeds_produce_identical_rows() {
    let dir_a = tempdir().expect("temp dir");
    let dir_b = tempdir().expect("temp dir");
    let (config_a, _) = write_config(dir_a.path());
    let (config_b, _) = write_config(dir_b.path());

    let outputs_a = config_a.resolved_outputs();
    let outputs_b = config_b.resolved_outputs();
    let summary_a = GenerationRunner::new(config_a, outputs_a)
        .unwrap()
        .run()
        .unwrap();
    let summary_b = GenerationRunner::new(config_b, outputs_b)
        .unwrap()
        .run()
        .unwrap();

    let rows_a = fs::read_to_string(summary_a.jsonl_path).unwrap();
    let rows_b = fs::read_to_string(summary_b.jsonl_path).unwrap();
    assert_eq!(rows_a, rows_b);
}

#[test]
fn cli_validates_without_dealing() {
    let dir = tempdir().expect("temp dir");
    let (_, config_path) = write_config(dir.path());

    Command::cargo_bin("dealsmith")
        .expect("binary exists")
        .arg("--config")
        .arg(&config_path)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation-only mode"));

    assert!(!dir.path().join("deals.jsonl").exists());
}

#[test]
fn cli_rejects_unviable_profile() {
    let dir = tempdir().expect("temp dir");
    let (_, config_path) = write_config(dir.path());
    // Overwrite the profile with one whose only North subprofile demands
    // fourteen cards.
    fs::write(
        dir.path().join("profile.json"),
        r#"{
            "seats": {
                "N": { "subprofiles": [ { "standard": {
                    "spades": { "min_cards": 7 },
                    "hearts": { "min_cards": 7 }
                } } ] },
                "E": { "subprofiles": [ { } ] },
                "S": { "subprofiles": [ { } ] },
                "W": { "subprofiles": [ { } ] }
            }
        }"#,
    )
    .unwrap();

    Command::cargo_bin("dealsmith")
        .expect("binary exists")
        .arg("--config")
        .arg(&config_path)
        .arg("--validate-only")
        .assert()
        .failure()
        .stderr(predicate::str::contains("viable"));
}
