use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn calc(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_calc"))
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run calc")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn eval_prints_results() {
    let dir = tempfile::tempdir().unwrap();
    for (args, expected) in [
        (["10", "add", "5"], "15"),
        (["10", "-", "5"], "5"),
        (["10", "*", "5"], "50"),
        (["10", "divide", "2"], "5"),
        (["7", "/", "2"], "3.5"),
    ] {
        let mut full = vec!["eval"];
        full.extend(args);
        let output = calc(dir.path(), &full);
        assert!(output.status.success(), "calc {full:?} failed");
        assert_eq!(stdout(&output), expected);
    }
}

#[test]
fn eval_integer_mode_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let output = calc(dir.path(), &["eval", "--integer", "--", "-7", "/", "2"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "-3");
}

#[test]
fn eval_divide_by_zero_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = calc(dir.path(), &["eval", "10", "/", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot divide by zero"), "stderr: {stderr}");
}

#[test]
fn eval_integer_overflow_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    for args in [
        ["eval", "--integer", "--", "-9223372036854775808", "/", "-1"],
        ["eval", "--integer", "--", "9223372036854775807", "+", "1"],
    ] {
        let output = calc(dir.path(), &args);
        assert_eq!(output.status.code(), Some(1), "calc {args:?}");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("calc_core.overflow"), "stderr: {stderr}");
        assert!(!stderr.contains("panicked"), "stderr: {stderr}");
    }
}

#[test]
fn eval_rejects_unknown_operation() {
    let dir = tempfile::tempdir().unwrap();
    let output = calc(dir.path(), &["eval", "1", "modulo", "2"]);
    assert!(!output.status.success());
}

#[test]
fn render_then_check_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let output = calc(dir.path(), &["ci", "render", "--out", ".github/workflows/ci.yml"]);
    assert!(output.status.success());
    let written = dir.path().join(".github/workflows/ci.yml");
    assert!(written.is_file());

    let output = calc(dir.path(), &["ci", "check"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    fs::write(
        dir.path().join("calc.toml"),
        "[pipeline]\nbranch = \"develop\"\n",
    )
    .unwrap();
    let output = calc(dir.path(), &["ci", "check"]);
    assert!(!output.status.success());
}

#[test]
fn committed_workflow_is_up_to_date() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let workflow = root.join(".github/workflows/ci.yml");
    let dir = tempfile::tempdir().unwrap();
    let output = calc(
        dir.path(),
        &["ci", "check", "--workflow", workflow.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn render_honours_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[pipeline]\nbranch = \"trunk\"\ntoolchain = \"stable\"\n").unwrap();
    let output = calc(dir.path(), &["--config", config.to_str().unwrap(), "ci", "render"]);
    assert!(output.status.success());
    let yaml = stdout(&output);
    assert!(yaml.contains("trunk"));
    assert!(yaml.contains("stable"));
}

#[test]
fn outcome_reports_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let output = calc(dir.path(), &["ci", "outcome", "0", "0", "1"]);
    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["status"], "failed");
    assert_eq!(report["failed_step"], 2);
    assert_eq!(report["steps"][3]["outcome"]["state"], "skipped");

    let output = calc(dir.path(), &["ci", "outcome", "0", "0", "0", "0"]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["status"], "success");
}

#[test]
fn outcome_of_unfinished_run_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = calc(dir.path(), &["ci", "outcome", "0", "0"]);
    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["status"], "incomplete");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Install dependencies"), "stderr: {stderr}");

    let output = calc(dir.path(), &["ci", "outcome"]);
    assert!(!output.status.success());
}
