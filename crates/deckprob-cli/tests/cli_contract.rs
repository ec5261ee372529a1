use serde_json::Value;
use std::process::{Command, Output};

fn deckprob(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deckprob"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to execute deckprob")
}

fn json_report(args: &[&str]) -> Value {
    let output = deckprob(args);
    assert_eq!(
        output.status.code(),
        Some(0),
        "deckprob {args:?} should succeed, stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "output should be JSON (stderr={}). parse error: {e}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

fn probability_of(report: &Value, rep: &[u64]) -> f64 {
    report["outcomes"]
        .as_array()
        .expect("outcomes should be an array")
        .iter()
        .find(|row| {
            row["representative"]
                .as_array()
                .map(|r| r.iter().filter_map(Value::as_u64).eq(rep.iter().copied()))
                .unwrap_or(false)
        })
        .and_then(|row| row["probability"].as_f64())
        .unwrap_or_else(|| panic!("outcome {rep:?} missing from report"))
}

#[test]
fn exact_two_category_scenario() {
    let report = json_report(&[
        "--partition", "3,2", "--draw", "2", "--format", "json", "exact", "--select", "0=1..2",
    ]);
    assert_eq!(report["method"], "exact");
    assert_eq!(report["outcome_count"], 3);
    assert!((probability_of(&report, &[0, 2]) - 0.1).abs() < 1e-9);
    assert!((probability_of(&report, &[1, 1]) - 0.6).abs() < 1e-9);
    assert!((probability_of(&report, &[2, 0]) - 0.3).abs() < 1e-9);
    let selected = report["selection"]["probability"].as_f64().unwrap();
    assert!((selected - 0.9).abs() < 1e-9, "selection gave {selected}");
}

#[test]
fn blank_category_is_reported() {
    let report = json_report(&[
        "--population", "60", "--partition", "40,10", "--draw", "7", "--format", "json", "exact",
        "--top", "5",
    ]);
    assert_eq!(report["population"]["blank_category"], 2);
    assert_eq!(
        report["population"]["partition"],
        serde_json::json!([40, 10, 10])
    );
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 5);
    assert!((report["total_mass"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn requirement_probability() {
    let report = json_report(&[
        "--partition", "3,2", "--draw", "2", "--format", "json", "exact", "--require", "0>=1",
        "--require", "1>=1",
    ]);
    let p = report["requirements"]["probability"].as_f64().unwrap();
    assert!((p - 0.6).abs() < 1e-9, "got {p}");
}

#[test]
fn simulate_is_reproducible_with_seed() {
    let args = [
        "--partition", "20,20,10,10", "--draw", "7", "--format", "json", "simulate", "--trials",
        "5000", "--seed", "42",
    ];
    let a = json_report(&args);
    let b = json_report(&args);
    assert_eq!(a["outcomes"], b["outcomes"]);
    assert_eq!(a["trials"]["completed"], 5000);
    assert_eq!(a["trials"]["seed"], 42);
    assert_eq!(a["method"], "monte_carlo");
}

#[test]
fn compare_reports_small_distance() {
    let report = json_report(&[
        "--partition", "3,2", "--draw", "2", "--format", "json", "compare", "--trials", "50000",
        "--seed", "9",
    ]);
    let tv = report["total_variation"].as_f64().unwrap();
    assert!(tv < 0.02, "total variation {tv} too large");
    assert_eq!(report["rows"].as_array().unwrap().len(), 3);
}

#[test]
fn text_output_is_default() {
    let output = deckprob(&["--partition", "3,2", "--draw", "2", "exact"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Distribution (exact)"), "stdout={stdout}");
    assert!(stdout.contains("(1, 1)"));
}

#[test]
fn overflowing_partition_fails() {
    let output = deckprob(&["--population", "4", "--partition", "3,2", "--draw", "1", "exact"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("exceeds declared population size"),
        "stderr={stderr}"
    );
}

#[test]
fn oversized_draw_fails() {
    let output = deckprob(&["--partition", "3,2", "--draw", "6", "exact"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exceeds population size"), "stderr={stderr}");
}

#[test]
fn inverted_selection_fails() {
    let output = deckprob(&["--partition", "3,2", "--draw", "2", "exact", "--select", "0=2..1"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Empty interval"), "stderr={stderr}");
}

#[test]
fn empty_selection_prints_positive_zero() {
    let output = deckprob(&["--partition", "3,2", "--draw", "2", "exact", "--select", "0=5.."]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("P[counts in (5.., ..)] = 0.000000"),
        "stdout={stdout}"
    );
    assert!(!stdout.contains("-0.000000"), "stdout={stdout}");

    let report = json_report(&[
        "--partition", "3,2", "--draw", "2", "--format", "json", "exact", "--select", "0=5..",
    ]);
    let p = report["selection"]["probability"].as_f64().unwrap();
    assert!(p == 0.0 && p.is_sign_positive(), "selection gave {p}");
}
