//! CLI integration tests

use sizer_lib::{PerformanceProfile, PlanRequest, Planner, VmFlavor};
use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Run the `ssz` binary isolated from the user's config file and environment
fn ssz(args: &[&str]) -> Output {
    command(args).output().expect("Failed to execute command")
}

fn command(args: &[&str]) -> Command {
    let home = std::env::temp_dir().join("ssz-cli-tests");
    let mut command = Command::new(env!("CARGO_BIN_EXE_ssz"));
    command
        .args(args)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("SSZ_API_URL")
        .env_remove("SSZ_PROFILE");
    command
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = ssz(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Capacity planner for streaming storage clusters"),
        "Should show app description"
    );
    assert!(stdout.contains("plan"), "Should show plan command");
    assert!(stdout.contains("interactive"), "Should show interactive command");
    assert!(stdout.contains("profile"), "Should show profile command");
    assert!(stdout.contains("SSZ_API_URL"), "Should show env var");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = ssz(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("ssz"), "Should show binary name");
}

/// Test plan subcommand help
#[test]
fn test_plan_help() {
    let output = ssz(&["plan", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Plan help should succeed");
    for flag in [
        "--vm-cpus",
        "--vm-ram-gb",
        "--failures",
        "--placement",
        "--events-per-second",
        "--event-size",
        "--latency-ms",
        "--streams",
        "--retention-hours",
        "--scales-per-hour",
        "--writers",
        "--readers",
        "--extra-clients",
        "--extra-ops-per-hour",
        "--transactions-per-hour",
        "--remote",
    ] {
        assert!(stdout.contains(flag), "Should show {} option", flag);
    }
}

/// Test a local availability plan rendered as a table
#[test]
fn test_plan_table() {
    let output = ssz(&["plan", "--vm-cpus", "8", "--vm-ram-gb", "32", "--failures", "1"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Plan should succeed");
    assert!(stdout.contains("VMs required"), "Should show VM count");
    assert!(stdout.contains("coordination"), "Should list services");
    assert!(
        !stdout.contains("Stream Scaling Policy"),
        "Should not suggest a trigger without a workload"
    );
}

/// Test a full local plan rendered as JSON
#[test]
fn test_plan_json() {
    let output = ssz(&[
        "--format",
        "json",
        "plan",
        "--vm-cpus",
        "8",
        "--vm-ram-gb",
        "32",
        "--failures",
        "1",
        "--events-per-second",
        "100000",
        "--event-size",
        "100",
        "--latency-ms",
        "10",
        "--streams",
        "10",
        "--writers",
        "10",
        "--readers",
        "10",
        "--transactions-per-hour",
        "360",
    ]);

    assert!(output.status.success(), "Plan should succeed");
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Should print JSON");
    assert_eq!(plan["vm_count"], 4);
    assert_eq!(plan["counts"]["storage"], 3);
    assert_eq!(plan["scaling_trigger"]["events_per_second"], 1000.0);
}

/// Test that an unknown event size is reported
#[test]
fn test_plan_unknown_event_size() {
    let output = ssz(&[
        "plan",
        "--vm-cpus",
        "8",
        "--vm-ram-gb",
        "32",
        "--events-per-second",
        "1000",
        "--event-size",
        "512",
        "--latency-ms",
        "10",
    ]);

    assert!(!output.status.success(), "Unknown event size should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("512"), "Should name the rejected size");
}

/// Test missing required argument error handling
#[test]
fn test_plan_missing_flavor() {
    let output = ssz(&["plan", "--failures", "1"]);

    assert!(!output.status.success(), "Missing flavor should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}

/// Test that partial flag groups are rejected
#[test]
fn test_plan_incomplete_data_plane_group() {
    let output = ssz(&["plan", "--vm-cpus", "8", "--vm-ram-gb", "32", "--event-size", "100"]);
    assert!(!output.status.success(), "Incomplete group should fail");
}

/// Test remote planning against a mock sizing service
#[test]
fn test_plan_remote() {
    let mut server = mockito::Server::new();
    let request = PlanRequest::new(VmFlavor::new(8, 32)).with_failures(2);
    let plan = Planner::new(PerformanceProfile::bare_metal())
        .unwrap()
        .plan(&request)
        .unwrap();
    let mock = server
        .mock("POST", "/api/v1/plans")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&plan).unwrap())
        .create();

    let output = ssz(&[
        "--api-url",
        &server.url(),
        "--format",
        "json",
        "plan",
        "--vm-cpus",
        "8",
        "--vm-ram-gb",
        "32",
        "--failures",
        "2",
        "--remote",
    ]);

    mock.assert();
    assert!(output.status.success(), "Remote plan should succeed");
    let received: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(received["vm_count"], plan.vm_count);
}

/// Test the interactive session with piped answers
#[test]
fn test_interactive_session() {
    let mut child = command(&["interactive"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"8\n32\nyes\n1\nno\nno\nno\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Interactive session should succeed");
    assert!(stdout.contains("How many CPU cores"), "Should prompt for the flavor");
    assert!(stdout.contains("VMs required"), "Should print the plan");
}

/// Test profile show
#[test]
fn test_profile_show_json() {
    let output = ssz(&["--format", "json", "profile", "show"]);

    assert!(output.status.success(), "Profile show should succeed");
    let profile: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(profile["name"], "bare-metal");
}

/// Test profile validate with a missing file
#[test]
fn test_profile_validate_missing_file() {
    let output = ssz(&["profile", "validate", "/nonexistent/profile.json"]);
    assert!(!output.status.success(), "Missing profile should fail");
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = ssz(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}
