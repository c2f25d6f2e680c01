//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn nback(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("nback").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn sequence_prints_one_symbol_per_round() {
    let dir = TempDir::new().unwrap();
    let output = nback(&dir)
        .args(["sequence", "--rounds", "12", "--seed", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let symbols: Vec<u32> = stdout
        .split_whitespace()
        .map(|s| s.parse().unwrap())
        .collect();
    assert_eq!(symbols.len(), 12);
    assert!(symbols.iter().all(|&s| s < 9));
}

#[test]
fn seeded_sequence_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let run = || {
        nback(&dir)
            .args(["sequence", "--modality", "audio", "--seed", "8"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn lag_not_below_rounds_is_rejected() {
    let dir = TempDir::new().unwrap();
    nback(&dir)
        .args(["sequence", "--rounds", "3", "--lag", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn short_interval_is_rejected() {
    let dir = TempDir::new().unwrap();
    nback(&dir)
        .args(["simulate", "--interval-ms", "500"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("display time"));
}

#[test]
fn perfect_simulation_saves_a_high_score() {
    let dir = TempDir::new().unwrap();
    let output = nback(&dir)
        .args(["simulate", "--accuracy", "1.0", "--seed", "2", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["accuracy"], 100.0);
    assert_eq!(report["summary"]["misses"], 0);
    assert_eq!(report["new_high_score"], true);

    let saved = std::fs::read_to_string(dir.path().join("nback_highscore.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["high_score"], report["score"]);
}

#[test]
fn simulation_reads_config_file_and_exports_results() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("game.toml"),
        "round_count = 15\nlag = 2\nmodality = \"audio-visual\"\n",
    )
    .unwrap();
    nback(&dir)
        .args([
            "simulate",
            "--config",
            "game.toml",
            "--results",
            "rounds.json",
            "--high-score-file",
            "scores/best.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rounds: 15, scored: 13"));

    let rounds: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("rounds.json")).unwrap())
            .unwrap();
    assert_eq!(rounds.as_array().unwrap().len(), 15);
    assert!(rounds[0]["stimulus"]["pair"].is_object());
}

#[test]
fn missing_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    nback(&dir)
        .args(["simulate", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}
