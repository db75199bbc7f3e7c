//! Integration tests for ruletable CLI

use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn run_ruletable(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_ruletable"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_ruletable(&["--help"]);

    assert!(success);
    assert!(stdout.contains("table"));
    assert!(stdout.contains("rules"));
    assert!(stdout.contains("percent"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_ruletable(&["--version"]);

    assert!(success);
    assert!(stdout.contains("ruletable"));
}

#[test]
fn test_table_output() {
    let results = fixture("results.json");
    let (stdout, _, success) = run_ruletable(&[
        "table",
        &results,
        "-c",
        "Domain=domain",
        "-c",
        "Time=time",
        "-c",
        "Derivability=derive:derivability",
    ]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].contains("Domain") && lines[0].contains("Derivability"));
    assert!(lines[1].chars().all(|c| c == '-'));
    assert!(lines[2].starts_with("bool") && lines[2].ends_with("75.0%"));
    assert!(lines[3].contains("31") && lines[3].ends_with("33.3%"));
    assert!(lines[4].contains("128.88") && lines[4].ends_with('-'));
}

#[test]
fn test_json_output() {
    let results = fixture("results.json");
    let (stdout, _, success) = run_ruletable(&[
        "table",
        &results,
        "-c",
        "Domain=domain",
        "-c",
        "Time=time",
        "-c",
        "Rules=rules:rules",
        "-c",
        "Count=rules:count",
        "--output",
        "json",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(
        parsed,
        serde_json::json!([
            {
                "Domain": "bool",
                "Time": "0.45",
                "Rules": "(& a b) <=> (& b a)<br />(| a a) ==> a",
                "Count": 3
            },
            {
                "Domain": "bv4",
                "Time": 31,
                "Rules": "(+ a 0) ==> a",
                "Count": 1
            },
            {
                "Domain": "rational",
                "Time": "128.88",
                "Rules": "-",
                "Count": 0
            }
        ])
    );
}

#[test]
fn test_json_keys_follow_column_order() {
    let results = fixture("results.json");
    let (stdout, _, success) = run_ruletable(&[
        "table", &results, "-c", "z=time", "-c", "a=domain", "-o", "json",
    ]);

    assert!(success);
    let z = stdout.find("\"z\"").unwrap();
    let a = stdout.find("\"a\"").unwrap();
    assert!(z < a);
}

#[test]
fn test_precision_option() {
    let results = fixture("results.json");
    let (stdout, _, success) = run_ruletable(&[
        "table", &results, "-c", "Time=time", "-p", "1", "-o", "json",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(
        parsed,
        serde_json::json!([{"Time": "0.5"}, {"Time": 31}, {"Time": "128.9"}])
    );
}

#[test]
fn test_multiline_rules_cell_stays_aligned() {
    let results = fixture("results.json");
    let (stdout, _, success) = run_ruletable(&[
        "table",
        &results,
        "-c",
        "Domain=domain",
        "-c",
        "Rules=rules:rules",
        "--separator",
        "\n",
    ]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    // header, dashes, two lines for bool, one each for bv4 and rational
    assert_eq!(lines.len(), 6);
    let width = lines[1].len();
    assert_eq!(lines[2], format!("bool{:>w$}", "(& a b) <=> (& b a)", w = width - 4));
    assert_eq!(lines[3], format!("{:>w$}", "(| a a) ==> a", w = width));
    assert!(lines[4].starts_with("bv4"));
}

#[test]
fn test_percent_decimals_out_of_range() {
    let (_, stderr, success) = run_ruletable(&["percent", "1", "3", "-d", "4294967295"]);

    assert!(!success);
    assert!(stderr.contains("decimals"));
}

#[test]
fn test_titled_json_output() {
    let results = fixture("results.json");
    let (stdout, _, success) = run_ruletable(&[
        "table",
        &results,
        "-c",
        "Domain=domain",
        "--title",
        "Inferred rules",
        "-o",
        "json",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(parsed["title"], "Inferred rules");
    assert_eq!(parsed["headers"], serde_json::json!(["Domain"]));
    assert_eq!(parsed["rows"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_csv_output() {
    let results = fixture("results.json");
    let (stdout, _, success) = run_ruletable(&[
        "table",
        &results,
        "-c",
        "Domain=domain",
        "-c",
        "Rules=rules:rules",
        "--separator",
        "; ",
        "-o",
        "csv",
    ]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "\"Domain\",\"Rules\"");
    assert_eq!(lines[1], "\"bool\",\"(& a b) <=> (& b a); (| a a) ==> a\"");
    assert_eq!(lines[3], "\"rational\",\"-\"");
}

#[test]
fn test_rules_command() {
    let rules = fixture("rules.txt");
    let (stdout, _, success) = run_ruletable(&["rules", &rules]);

    assert!(success);
    assert_eq!(
        stdout,
        "(+ a b) <=> (+ b a)\n(* a 1) <=> a\n(- a a) ==> 0\n"
    );
}

#[test]
fn test_rules_command_html_separator() {
    let rules = fixture("rules.txt");
    let (stdout, _, success) = run_ruletable(&["rules", &rules, "--separator", "<br />"]);

    assert!(success);
    assert_eq!(
        stdout.trim_end(),
        "(+ a b) <=> (+ b a)<br />(* a 1) <=> a<br />(- a a) ==> 0"
    );
}

#[test]
fn test_percent_command() {
    let (stdout, _, success) = run_ruletable(&["percent", "1", "2", "--decimals", "1"]);
    assert!(success);
    assert_eq!(stdout, "50.0%\n");

    let (stdout, _, success) = run_ruletable(&["percent", "3", "3", "-d", "2"]);
    assert!(success);
    assert_eq!(stdout, "100%\n");

    let (stdout, _, success) = run_ruletable(&["percent", "1", "0"]);
    assert!(success);
    assert_eq!(stdout, "Infinity%\n");
}

#[test]
fn test_invalid_path() {
    let (_, stderr, success) = run_ruletable(&["table", "/nonexistent/rows.json", "-c", "x=a"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("failed to read file"));
}

#[test]
fn test_rows_must_be_an_array() {
    let scalar = fixture("scalar.json");
    let (_, stderr, success) = run_ruletable(&["table", &scalar, "-c", "x=a"]);

    assert!(!success);
    assert!(stderr.contains("invalid input"));
}

#[test]
fn test_invalid_column_spec() {
    let results = fixture("results.json");
    let (_, stderr, success) = run_ruletable(&["table", &results, "-c", "x=time:median"]);

    assert!(!success);
    assert!(stderr.contains("invalid column spec"));
}
