use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn xln(store: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("xln-inspect"));
    cmd.env_remove("XLN_STORE")
        .env_remove("XLN_SETTINGS")
        .env_remove("XLN_FETCH_TIMEOUT_MS")
        .env_remove("RUST_LOG")
        .arg("--store")
        .arg(store);
    cmd
}

fn export(dir: &Path) -> PathBuf {
    let frames = json!([
        {
            "height": 1,
            "timestamp": 1000,
            "logs": [
                {"level": "info", "category": "system", "message": "Runtime started"}
            ]
        },
        {
            "height": 2,
            "timestamp": 2000,
            "replicas": {
                "E1:S1": {"entityId": "E1", "signerId": "S1", "height": 3,
                          "reserves": {"1": "1500000000000000000"}},
                "E2:S1": {"entityId": "E2", "signerId": "S1", "height": 1}
            },
            "jMachines": [["arrakis", {"name": "arrakis", "chainId": 1337, "blockNumber": 42}]],
            "logs": [
                {"level": "debug", "category": "consensus", "message": "Proposal built", "entityId": "E1"},
                {"level": "warn", "category": "account", "message": "Credit limit near", "entityId": "E2"},
                {"level": "info", "category": "consensus", "message": "Frame COMMITTED", "entityId": "E1"}
            ]
        }
    ]);
    let path = dir.join("frames.json");
    fs::write(&path, serde_json::to_vec_pretty(&frames).unwrap()).unwrap();
    path
}

fn imported() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("tmpdir");
    let store = tmp.path().join("store");
    let from = export(tmp.path());
    xln(&store)
        .args(["import", "--from"])
        .arg(&from)
        .assert()
        .success()
        .stdout(predicate::str::contains("imported 2 frames (head 2)"));
    (tmp, store)
}

fn json_stdout(cmd: &mut Command) -> Value {
    let assert = cmd.assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&output).expect("json")
}

#[test]
fn empty_store_reports_no_frames() {
    let tmp = TempDir::new().unwrap();
    xln(&tmp.path().join("missing"))
        .arg("head")
        .assert()
        .success()
        .stdout(predicate::str::contains("no frames"));
}

#[test]
fn head_reports_live_height() {
    let (_tmp, store) = imported();
    let json = json_stdout(xln(&store).args(["head", "--json"]));
    assert_eq!(json["data"]["height"], json!(2));
    assert_eq!(json["data"]["frames"], json!(2));
}

#[test]
fn reimport_is_rejected_as_non_advancing() {
    let (tmp, store) = imported();
    xln(&store)
        .args(["import", "--from"])
        .arg(tmp.path().join("frames.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("append frame at height 1"));
}

#[test]
fn logs_use_default_filter_on_live_frame() {
    let (_tmp, store) = imported();
    xln(&store)
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Frame COMMITTED"))
        .stdout(predicate::str::contains("Credit limit near"))
        .stdout(predicate::str::contains("Proposal built").not())
        .stderr(predicate::str::contains("1 of 3 entries hidden by filter"));
}

#[test]
fn logs_search_and_entity_narrow_results() {
    let (_tmp, store) = imported();
    let json = json_stdout(xln(&store).args(["logs", "--all", "--search", "committed", "--json"]));
    let visible = json["data"].as_array().unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0]["message"], json!("Frame COMMITTED"));
    assert_eq!(json["meta"]["total"], json!(3));

    let json = json_stdout(xln(&store).args(["logs", "--all", "--entity", "E1", "--json"]));
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[test]
fn logs_time_travel_clamps_and_falls_back_to_live() {
    let (_tmp, store) = imported();
    let json = json_stdout(xln(&store).args(["logs", "--at", "0", "--json"]));
    assert_eq!(json["meta"]["height"], json!(1));
    assert_eq!(json["meta"]["view"], json!("frame 1/2 (height 1)"));

    let json = json_stdout(xln(&store).args(["logs", "--at", "99", "--json"]));
    assert_eq!(json["meta"]["height"], json!(2));
    assert_eq!(json["meta"]["live"], json!(false));

    let json = json_stdout(xln(&store).args(["logs", "--at", "-1", "--json"]));
    assert_eq!(json["meta"]["height"], json!(2));
    assert_eq!(json["meta"]["live"], json!(true));
}

#[test]
fn logs_distinguish_empty_frame_from_filtered_out() {
    let (_tmp, store) = imported();
    xln(&store)
        .args(["logs", "--at", "0", "--level", "error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no log entries match the active filter"));
}

#[test]
fn replicas_filter_by_entity() {
    let (_tmp, store) = imported();
    xln(&store)
        .args(["replicas", "--entity", "E1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("E1 / S1"))
        .stdout(predicate::str::contains("reserves 1=1.5"))
        .stdout(predicate::str::contains("E2").not());

    let json = json_stdout(xln(&store).args(["replicas", "--json"]));
    assert_eq!(json["meta"]["entities"], json!(["E1", "E2"]));

    xln(&store)
        .args(["replicas", "--at", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no replicas in frame"));
}

#[test]
fn jmachines_accept_pair_encoding() {
    let (_tmp, store) = imported();
    xln(&store)
        .arg("jmachines")
        .assert()
        .success()
        .stdout(predicate::str::contains("arrakis  chain 1337  block 42"));
}

#[test]
fn saved_log_filter_becomes_the_default() {
    let (_tmp, store) = imported();
    xln(&store)
        .args(["settings", "set", "theme", "light"])
        .assert()
        .success();
    xln(&store)
        .args(["settings", "get", "theme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("light"));

    xln(&store)
        .args([
            "settings",
            "set",
            "logFilter",
            r#"{"activeLevels":["debug"],"activeCategories":["consensus"]}"#,
        ])
        .assert()
        .success();
    xln(&store)
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Proposal built"))
        .stdout(predicate::str::contains("Frame COMMITTED").not());

    xln(&store).args(["settings", "reset"]).assert().success();
    xln(&store)
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Frame COMMITTED"));
}

#[test]
fn settings_set_rejects_invalid_values() {
    let tmp = TempDir::new().unwrap();
    xln(tmp.path())
        .args(["settings", "set", "theme", "neon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("set 'theme'"));
}

#[test]
fn insurance_lines_and_unavailable_feature() {
    let tmp = TempDir::new().unwrap();
    let with_insurance = tmp.path().join("arrakis.json");
    fs::write(
        &with_insurance,
        serde_json::to_vec(&json!({
            "name": "arrakis",
            "insurance": {
                "E1": [{
                    "insurer": "0xabc",
                    "tokenId": 1,
                    "remaining": "2000000000000000000",
                    "expiresAt": "99999999999999999999999"
                }]
            }
        }))
        .unwrap(),
    )
    .unwrap();
    let without = tmp.path().join("plain.json");
    fs::write(&without, b"{\"name\": \"plain\"}").unwrap();

    xln(tmp.path())
        .args(["insurance", "--entity", "E1", "--jurisdiction"])
        .arg(&with_insurance)
        .assert()
        .success()
        .stdout(predicate::str::contains("0xabc  token 1  remaining 2  never"));

    xln(tmp.path())
        .args(["insurance", "--entity", "E9", "--jurisdiction"])
        .arg(&with_insurance)
        .assert()
        .success()
        .stdout(predicate::str::contains("no insurance lines for entity E9"));

    xln(tmp.path())
        .args(["insurance", "--entity", "E1", "--jurisdiction"])
        .arg(&without)
        .assert()
        .success()
        .stdout(predicate::str::contains("insurance not available in jurisdiction plain"));
}
