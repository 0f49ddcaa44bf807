use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture_path(name: &str) -> String {
    workspace_root()
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_swade-sheet"))
        .args(args)
        .output()
        .expect("failed to run swade-sheet CLI")
}

fn temp_tables_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("swade_tables_{}_{}.json", std::process::id(), nanos))
}

#[test]
fn field_flags_print_key_value_lines() {
    let path = fixture_path("mika.txt");
    let output = run_cli(&["--toughness", "--name", &path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "name=Mika\ntoughness=7\narmorValue=2");
}

#[test]
fn quick_info_flags_print_in_canonical_order() {
    let path = fixture_path("mika.txt");
    let output = run_cli(&["--cybertech", "--gender", "--rank", &path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "rank=Veteran\ngender=Female\ncybertech=");
}

#[test]
fn trait_fields_are_flattened() {
    let path = fixture_path("mika.txt");
    let output = run_cli(&["--attributes", &path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        "attributes=agility d8, smarts d6, spirit d6, strength d6, vigor d6"
    );
}

#[test]
fn json_flag_renders_full_sheet() {
    let path = fixture_path("mika.html");
    let output = run_cli(&["--json", &path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["format"], "markup");
    assert_eq!(json["name"], "Mika");
    assert_eq!(json["isWildCard"], true);
    assert_eq!(json["weapons"][0]["damage"], "d6+d8");
    assert_eq!(json["issues"].as_array().map(Vec::len), Some(0));
}

#[test]
fn json_with_fields_renders_subset() {
    let path = fixture_path("mika.txt");
    let output = run_cli(&["--json", "--bennies", "--xp", &path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    let keys: Vec<&str> = json
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["experience", "bennies"]);
    assert_eq!(json["experience"], 40);
}

#[test]
fn default_output_is_stat_block() {
    let path = fixture_path("mika.txt");
    let output = run_cli(&[&path]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().next(), Some("Mika (Wild Card)"));
    assert!(stdout.contains("Pace: 6; Parry: 6; Toughness: 7 (2); Size: +1"));
}

#[test]
fn stdin_with_text_hint() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_swade-sheet"))
        .args(["--text", "--skills", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn swade-sheet CLI");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(b"Grunt\nSkills: Fighting d6, Shooting d4\n")
        .expect("failed to write stdin");
    let output = child.wait_with_output().expect("failed to wait for CLI");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        "skills=fighting d6, shooting d4, unskilled d4-2"
    );
}

#[test]
fn tables_override_is_applied() {
    let tables = temp_tables_path();
    std::fs::write(&tables, r#"{ "unskilled_die": "d4-1" }"#).expect("failed to write tables");
    let tables_arg = tables.to_string_lossy().to_string();
    let path = fixture_path("mika.txt");

    let output = run_cli(&["--tables", &tables_arg, "--json", "--skills", &path]);
    let _ = std::fs::remove_file(&tables);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    let skills = json["skills"].as_array().expect("skills should be an array");
    let last = skills.last().expect("skills should not be empty");
    assert_eq!(last["name"], "unskilled");
    assert_eq!(last["die"], "d4-1");
}

#[test]
fn sheet_without_sections_warns_on_stderr() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_swade-sheet"))
        .args(["--name", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn swade-sheet CLI");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(b"Nobody in particular\n")
        .expect("failed to write stdin");
    let output = child.wait_with_output().expect("failed to wait for CLI");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stdout.trim(), "name=Nobody in particular");
    assert!(stderr.contains("warning: no sheet sections recognised"));
}

#[test]
fn missing_file_exits_with_error() {
    let output = run_cli(&["/definitely/not/here.txt"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error reading"));
}

#[test]
fn conflicting_format_flags_are_usage_errors() {
    let path = fixture_path("mika.txt");
    let output = run_cli(&["--html", "--text", &path]);
    assert_eq!(output.status.code(), Some(2));

    let output = run_cli(&["--format", "pdf", &path]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown sheet format 'pdf'"));
}
