//! Black-box tests for the `packetscope` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn packetscope() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("packetscope");
    // Inherited log filters would leak onto stderr and break the assertions
    cmd.env_remove("RUST_LOG");
    cmd
}

fn parse_stdout(cmd: &mut Command) -> serde_json::Value {
    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_prints_contract_to_stdout() {
    let contract = parse_stdout(&mut packetscope());

    assert_eq!(contract["version"], "2.0.0");
    assert_eq!(contract["kernelVersion"], "5.10.8");
    assert_eq!(contract["paths"].as_array().unwrap().len(), 2);
    assert_eq!(contract["paths"][0]["path"]["id"], "tcp_ipv4_egress");
}

#[test]
fn test_writes_contract_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contract.json");

    packetscope()
        .arg("-o")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Contract written to"));

    let written = std::fs::read_to_string(&path).unwrap();
    let contract: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(contract["metadata"]["headerSizes"]["tcp"], 20);
}

#[test]
fn test_compact_output_is_a_single_line() {
    let assert = packetscope().arg("--compact").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert!(!stdout.trim_end().contains('\n'));
    let contract: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(contract["version"], "2.0.0");
}

#[test]
fn test_no_sim_drops_the_simulations() {
    let contract = parse_stdout(packetscope().arg("--no-sim"));

    for entry in contract["paths"].as_array().unwrap() {
        assert!(entry.get("simulation").is_none());
        assert!(entry.get("path").is_some());
    }
}

#[test]
fn test_buffer_flags_flow_into_the_simulation() {
    let contract = parse_stdout(packetscope().args(["--buffer", "4096", "--payload", "256"]));

    assert_eq!(contract["metadata"]["bufferSize"], 4096);
    assert_eq!(contract["metadata"]["payloadSize"], 256);

    let first_step = &contract["paths"][0]["simulation"][0];
    assert_eq!(first_step["skbuffState"]["data"], 4096 - 256);
    assert_eq!(first_step["skbuffState"]["end"], 4096);
}

#[test]
fn test_help_lists_the_output_flags() {
    packetscope()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--output")
                .and(predicate::str::contains("--compact"))
                .and(predicate::str::contains("--no-sim"))
                .and(predicate::str::contains("--buffer"))
                .and(predicate::str::contains("--payload")),
        );
}
