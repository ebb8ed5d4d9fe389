//! E2E tests for the propdep commands

use std::io::Write;
use std::process::{Command, Output, Stdio};

const AS_OF: &str = "2026-01-01";

fn propdep(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_propdep"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn calculate_json(extra: &[&str]) -> serde_json::Value {
    let mut args = vec!["calculate", "-r", "tests/data/request.json", "--as-of", AS_OF, "--json"];
    args.extend_from_slice(extra);
    let output = propdep(&args);
    assert!(output.status.success(), "Command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("Output is not JSON")
}

/// Schedule table with totals and digest
#[test]
fn calculate_table() {
    let output = propdep(&["calculate", "-r", "tests/data/request.json", "--as-of", AS_OF]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("DEPRECIATION SCHEDULE (Residential property"));
    assert!(stdout.contains("as of 2026-01-01)"));
    assert!(stdout.contains("Diminishing Value"));
    // 1250 diminishing value + 10300 capital works on building plus deck
    assert!(stdout.contains("11550.00"));
    assert!(stdout.contains("First year:          $11550.00"));
    assert!(stdout.contains("Audit digest: "));
}

#[test]
fn calculate_json_response() {
    let response = calculate_json(&[]);
    let rows = response["yearly_breakdown"].as_array().unwrap();

    assert_eq!(rows.len(), 40);
    assert_eq!(rows[0]["year"], 1);
    assert_eq!(rows[39]["year"], 40);
    assert_eq!(response["property_type"], "residential");
    assert_eq!(response["first_year_depreciation"], "11550.00");
    assert_eq!(rows[0]["prime_cost"], "625.00");
    assert_eq!(rows[8]["prime_cost"], "0.00");
    // building was 10 years old at purchase: 30 years of capital works remain
    assert_eq!(rows[29]["capital_works"], "10300.00");
    assert_eq!(rows[30]["capital_works"], "0.00");
}

/// Same request twice gives the same bytes
#[test]
fn calculate_is_deterministic() {
    let args = ["calculate", "-r", "tests/data/request.json", "--as-of", AS_OF];
    let first = propdep(&args);
    let second = propdep(&args);

    assert!(first.status.success(), "Command failed: {:?}", first);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn calculate_csv_limited_years() {
    let output = propdep(&[
        "calculate",
        "-r",
        "tests/data/request.json",
        "--as-of",
        AS_OF,
        "--csv",
        "--years",
        "5",
    ]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "year,diminishing_value,prime_cost,capital_works,total");
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "1,1250.00,625.00,10300.00,11550.00");
}

/// CSV assets are added to the request's own
#[test]
fn calculate_with_asset_csv() {
    let response = calculate_json(&["--assets", "tests/data/assets.csv"]);
    let row = &response["yearly_breakdown"][0];

    // 1250 + 800 + 300 diminishing value
    assert_eq!(row["diminishing_value"], "2350.00");
    assert_eq!(row["prime_cost"], "1175.00");
    assert_eq!(response["first_year_depreciation"], "12650.00");
}

#[test]
fn calculate_with_regime_file() {
    let response = calculate_json(&["--regime", "tests/data/regime.json"]);
    // 412000 at 4%
    assert_eq!(response["yearly_breakdown"][0]["capital_works"], "16480.00");
    assert_eq!(response["first_year_depreciation"], "17730.00");
}

/// Established property gets no capital works under the strict regime
#[test]
fn calculate_strict_regime() {
    let response = calculate_json(&["--strict"]);
    assert_eq!(response["yearly_breakdown"][0]["capital_works"], "0.00");
    assert_eq!(response["first_year_depreciation"], "1250.00");
}

#[test]
fn calculate_without_assets() {
    let output = propdep(&["calculate", "-r", "tests/data/no_assets.json", "--as-of", AS_OF, "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["property_type"], "commercial");
    assert_eq!(response["first_year_depreciation"], "20000.00");
    assert_eq!(response["five_year_depreciation"], "100000.00");
    assert_eq!(response["total_depreciable_amount"], "800000.00");
}

#[test]
fn calculate_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_propdep"))
        .args(["calculate", "-r", "-", "--as-of", AS_OF, "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    let request = std::fs::read("tests/data/request.json").unwrap();
    child.stdin.take().unwrap().write_all(&request).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "Command failed: {:?}", output);
    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["first_year_depreciation"], "11550.00");
}

#[test]
fn calculate_rejects_future_purchase() {
    let output = propdep(&["calculate", "-r", "tests/data/request.json", "--as-of", "2024-12-31"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("in the future"));
}

#[test]
fn calculate_rejects_invalid_request() {
    let output = propdep(&["calculate", "-r", "tests/data/invalid.json", "--as-of", AS_OF]);
    assert!(!output.status.success());
}

#[test]
fn summary_text() {
    let output = propdep(&["summary", "-r", "tests/data/request.json", "--as-of", AS_OF]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("DEPRECIATION SUMMARY (Residential property)"));
    assert!(stdout.contains("Recommended: Diminishing Value"));
    assert!(stdout.contains("Capital works: 2.50% a year for up to 40 years"));
    assert!(stdout.contains("TAX SAVINGS @ 32%"));
    // 11550 at 32%
    assert!(stdout.contains("First year: $3696.00"));
}

#[test]
fn summary_shows_regime_rate() {
    let output = propdep(&[
        "summary",
        "-r",
        "tests/data/request.json",
        "--as-of",
        AS_OF,
        "--regime",
        "tests/data/regime.json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("Capital works: 4.00% a year"));
}

#[test]
fn summary_json_with_marginal_rate() {
    let output = propdep(&[
        "summary",
        "-r",
        "tests/data/request.json",
        "--as-of",
        AS_OF,
        "--marginal-rate",
        "0.45",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["method_comparison"]["recommended"], "diminishing_value");
    assert_eq!(summary["tax_savings"]["marginal_rate"], "0.45");
    // 11550 at 45%
    assert_eq!(summary["tax_savings"]["first_year"], "5197.50");
}

#[test]
fn cashflow_projection() {
    let output = propdep(&["cashflow", "-r", "tests/data/request.json", "--as-of", AS_OF]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("CASH FLOW PROJECTION"));
    assert!(stdout.contains("Loan: $400000.00 at $2398.20/month"));
    assert!(stdout.contains("Gross yield: 4.80%"));
    assert!(stdout.contains("Cap rate: 3.65%"));
    assert!(stdout.contains("Cash-on-cash return:"));
}

#[test]
fn cashflow_json_years() {
    let output = propdep(&[
        "cashflow",
        "-r",
        "tests/data/request.json",
        "--as-of",
        AS_OF,
        "--years",
        "3",
        "--json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let projection: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(projection["years"].as_array().unwrap().len(), 3);
    assert_eq!(projection["years"][0]["rental_income"], "31200.00");
    assert_eq!(projection["monthly_repayment"], "2398.20");
}

#[test]
fn validate_clean_request() {
    let output = propdep(&["validate", "-r", "tests/data/request.json", "--as-of", AS_OF]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("No issues found."));
}

/// Every problem is listed and the exit code is 1
#[test]
fn validate_reports_all_issues() {
    let output = propdep(&["validate", "-r", "tests/data/invalid.json", "--as-of", AS_OF, "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["issue_count"], 3);
    let fields: Vec<&str> = result["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["land_value", "assets[0].effective_life", "loan_term"]);
}

#[test]
fn schema_csv_header() {
    let output = propdep(&["schema", "csv-header"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(stdout(&output).trim(), "name,category,value,effective_life");
}

#[test]
fn schema_csv_fields() {
    let output = propdep(&["schema", "csv-fields"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("effective_life   (optional)"));
    assert!(stdout.contains("name             (required)"));
}

#[test]
fn schema_json() {
    let output = propdep(&["schema", "json-schema"]);
    let stdout = stdout(&output);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("DepreciationRequest"));
    assert!(stdout.contains("purchase_price"));
    assert!(stdout.contains("plant_equipment"));

    let output = propdep(&["schema", "response-schema"]);
    assert!(stdout_contains(&output, "yearly_breakdown"));
}

fn stdout_contains(output: &Output, needle: &str) -> bool {
    output.status.success() && stdout(output).contains(needle)
}
