//! CLI behavior via the built binary.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;

fn picklock() -> Command {
    Command::cargo_bin("picklock").expect("binary exists")
}

#[test]
fn help_lists_subcommands() {
    picklock()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("picks"))
        .stdout(predicate::str::contains("circuits"));
}

#[test]
fn publish_rejects_malformed_date() {
    let env = support::test_env();
    picklock()
        .args(["publish", "--date", "08/05/2026"])
        .args(["--config", env.config_path.to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn publish_rejects_unknown_trigger() {
    let env = support::test_env();
    picklock()
        .args(["publish", "--date", "2026-08-05", "--trigger", "cron"])
        .args(["--config", env.config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown trigger source"));
}

#[test]
fn picks_add_rejects_malformed_game_id() {
    let env = support::test_env();
    picklock()
        .args([
            "picks",
            "add",
            "--player",
            "smith-j",
            "--game-id",
            "BOS-at-LAL",
            "--team",
            "BOS",
            "--opponent",
            "LAL",
            "--recommendation",
            "over",
            "--line",
            "25.5",
            "--added-by",
            "ops",
        ])
        .args(["--config", env.config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("game_id"));
}

#[test]
fn add_list_publish_remove_cycle() {
    let env = support::test_env();
    let config = ["--config", env.config_path.to_str().unwrap()];

    picklock()
        .args([
            "picks",
            "add",
            "--player",
            "smith-j",
            "--game-id",
            "20260805_BOS_LAL",
            "--team",
            "BOS",
            "--opponent",
            "LAL",
            "--recommendation",
            "under",
            "--line",
            "25.5",
            "--angle",
            "tough matchup",
            "--added-by",
            "ops",
        ])
        .args(config)
        .assert()
        .success()
        .stdout(predicate::str::contains("manual pick added"));

    picklock()
        .args(["picks", "list", "--date", "2026-08-05"])
        .args(config)
        .assert()
        .success()
        .stdout(predicate::str::contains("smith-j"))
        .stdout(predicate::str::contains("UNDER 25.5"));

    picklock()
        .args(["publish", "--date", "2026-08-05", "--trigger", "manual"])
        .args(config)
        .assert()
        .success()
        .stdout(predicate::str::contains("artifact published"));

    let artifact = env.export_dir.join("best_picks_2026-08-05.json");
    let body = std::fs::read_to_string(&artifact).expect("artifact written");
    assert!(body.contains("smith-j"));

    picklock()
        .args(["picks", "remove", "--date", "2026-08-05", "--player", "smith-j"])
        .args(config)
        .assert()
        .success()
        .stdout(predicate::str::contains("deactivated"));

    // After removal the next publish no longer carries the pick.
    picklock()
        .args(["publish", "--date", "2026-08-05", "--trigger", "manual"])
        .args(config)
        .assert()
        .success();
    let body = std::fs::read_to_string(&artifact).expect("artifact rewritten");
    assert!(!body.contains("smith-j"));
}

#[test]
fn circuits_status_runs_on_fresh_database() {
    let env = support::test_env();
    picklock()
        .args(["circuits", "status"])
        .args(["--config", env.config_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Circuits"));
}
