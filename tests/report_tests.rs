use std::path::{Path, PathBuf};

use ctest_dashboard::report::console::format_console_report;
use ctest_dashboard::report::json::generate_json_summary;
use ctest_dashboard::report::markdown::{default_dashboard_path, render_markdown, write_dashboard};
use ctest_dashboard::report::report_model::{
    AggregateTotals, Collection, FailureRecord, SkippedFile,
};

mod common;
use crate::common::fixtures::fixed_time;

// ============================================================================
// Helper builders
// ============================================================================

fn failure(classname: &str, name: &str, run: &str, message: &str, details: &str) -> FailureRecord {
    FailureRecord {
        suite: "Suite".into(),
        classname: classname.into(),
        name: name.into(),
        message: message.into(),
        details: details.into(),
        run: run.into(),
    }
}

fn one_failure_collection() -> Collection {
    Collection {
        files: vec![PathBuf::from("Testing/run1/results.xml")],
        totals: AggregateTotals {
            tests: 5,
            failures: 1,
            errors: 0,
            skipped: 0,
        },
        failures: vec![failure(
            "ModelFixture",
            "HeatPump_Curves",
            "run1",
            "Expected equality",
            "file.cpp:42",
        )],
        skipped_files: vec![],
    }
}

// ============================================================================
// 1. Totals math
// ============================================================================

#[test]
fn success_rate_is_zero_without_tests() {
    let totals = AggregateTotals::default();
    assert_eq!(totals.passed(), 0);
    assert_eq!(totals.success_rate(), 0.0);
}

#[test]
fn inconsistent_counters_give_negative_passed() {
    let totals = AggregateTotals {
        tests: 2,
        failures: 3,
        errors: 1,
        skipped: 0,
    };
    assert_eq!(totals.passed(), -2);
    assert_eq!(totals.success_rate(), -100.0);
}

#[test]
fn passed_does_not_overflow_at_the_counter_limits() {
    let totals = AggregateTotals {
        tests: -i64::MAX,
        failures: 5,
        errors: i64::MAX,
        skipped: 0,
    };
    assert_eq!(
        totals.passed(),
        -i128::from(i64::MAX) - 5 - i128::from(i64::MAX)
    );
    assert_eq!(totals.success_rate(), 0.0);
}

// ============================================================================
// 2. Markdown — empty input
// ============================================================================

#[test]
fn markdown_empty_collection_is_exact() {
    let doc = render_markdown(&Collection::default(), fixed_time());
    let expected = "# Test Results Dashboard\n\
| Metric | Value |\n\
|--------|-------|\n\
| Total Tests | 0 |\n\
| Passed | 0 |\n\
| Failed | 0 |\n\
| Errors | 0 |\n\
| Skipped | 0 |\n\
| Success Rate | 0.0% |\n\
| Generated | 2024-03-05 07:08:09 UTC |\n\
\n\
## All Tests Passed\n\
\n\
## Test Runs\n\
\n\
| Run | XML File | Status |\n\
|-----|----------|--------|\n\
| - | No XML files | Missing |\n";
    assert_eq!(doc, expected);
}

// ============================================================================
// 3. Markdown — failures
// ============================================================================

#[test]
fn markdown_single_failure_section() {
    let doc = render_markdown(&one_failure_collection(), fixed_time());

    assert!(doc.contains("| Total Tests | 5 |\n"));
    assert!(doc.contains("| Passed | 4 |\n"));
    assert!(doc.contains("| Failed | 1 |\n"));
    assert!(doc.contains("| Success Rate | 80.0% |\n"));
    assert!(doc.contains("## Failed Tests (1)\n\n"));
    assert!(!doc.contains("All Tests Passed"));
    assert_eq!(doc.matches("<details>").count(), 1);

    let section = "<details>\n\
<summary><strong>ModelFixture.HeatPump_Curves</strong> (run1)</summary>\n\
\n\
**Message:**\n\
````\n\
Expected equality\n\
````\n\
\n\
**Details:**\n\
````\n\
file.cpp:42\n\
````\n\
\n\
</details>\n\
\n";
    assert!(doc.contains(section), "section missing from:\n{}", doc);
    assert!(doc.ends_with("| run1 | `results.xml` | Present |\n"));
}

#[test]
fn markdown_omits_empty_message_and_details_blocks() {
    let mut collection = one_failure_collection();
    collection.failures = vec![
        failure("A", "no_message", "run1", "", "only details"),
        failure("B", "no_details", "run1", "only message", ""),
        failure("C", "bare", "run1", "", ""),
    ];
    let doc = render_markdown(&collection, fixed_time());

    assert_eq!(doc.matches("**Message:**").count(), 1);
    assert_eq!(doc.matches("**Details:**").count(), 1);
    assert!(doc.contains(
        "<summary><strong>C.bare</strong> (run1)</summary>\n\n</details>\n\n"
    ));
}

#[test]
fn markdown_success_rate_has_one_decimal() {
    let mut collection = Collection::default();
    collection.totals = AggregateTotals {
        tests: 3,
        failures: 1,
        errors: 0,
        skipped: 0,
    };
    let doc = render_markdown(&collection, fixed_time());
    assert!(doc.contains("| Success Rate | 66.7% |"));
}

#[test]
fn markdown_lists_every_run_in_order() {
    let collection = Collection {
        files: vec![
            PathBuf::from("T/run1/results.xml"),
            PathBuf::from("T/run10/results.xml"),
            PathBuf::from("T/run2/results.xml"),
        ],
        ..Collection::default()
    };
    let doc = render_markdown(&collection, fixed_time());
    let runs_table = doc.split("## Test Runs").nth(1).unwrap();
    let rows: Vec<_> = runs_table.lines().filter(|l| l.ends_with("Present |")).collect();
    assert_eq!(
        rows,
        vec![
            "| run1 | `results.xml` | Present |",
            "| run10 | `results.xml` | Present |",
            "| run2 | `results.xml` | Present |",
        ]
    );
    assert!(!doc.contains("Missing"));
}

#[test]
fn markdown_renders_identically_apart_from_timestamp() {
    let collection = one_failure_collection();
    let a = render_markdown(&collection, fixed_time());
    let b = render_markdown(&collection, chrono::Utc::now());

    let strip = |doc: &str| -> Vec<String> {
        doc.lines()
            .filter(|l| !l.starts_with("| Generated |"))
            .map(String::from)
            .collect()
    };
    assert_eq!(strip(&a), strip(&b));
}

// ============================================================================
// 4. Writing
// ============================================================================

#[test]
fn write_dashboard_creates_directories_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let output = default_dashboard_path(dir.path());
    assert_eq!(output, dir.path().join("dashboard").join("test-dashboard.md"));

    write_dashboard(&output, &one_failure_collection(), fixed_time()).unwrap();
    assert!(std::fs::read_to_string(&output).unwrap().contains("Failed Tests (1)"));

    write_dashboard(&output, &Collection::default(), fixed_time()).unwrap();
    let second = std::fs::read_to_string(&output).unwrap();
    assert!(second.contains("All Tests Passed"));
    assert!(!second.contains("Failed Tests"));
}

#[test]
fn write_dashboard_reports_unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the dashboard directory should go
    std::fs::write(dir.path().join("dashboard"), "not a directory").unwrap();

    let result = write_dashboard(
        &default_dashboard_path(dir.path()),
        &Collection::default(),
        fixed_time(),
    );
    assert!(result.is_err());
}

// ============================================================================
// 5. Console report
// ============================================================================

#[test]
fn console_report_lists_failures_and_summary() {
    let output = format_console_report(&one_failure_collection(), Path::new("out.md"));
    assert!(output.contains("\u{2717} FAIL  ModelFixture.HeatPump_Curves (run1)"));
    assert!(output.contains("4 passed, 1 failed, 0 errors, 0 skipped (5 total, 80.0%)"));
    assert!(output.contains("Dashboard: out.md"));
}

#[test]
fn console_report_all_passed_and_skipped_files() {
    let collection = Collection {
        skipped_files: vec![SkippedFile {
            path: PathBuf::from("T/run2/results.xml"),
            reason: "no root element found".into(),
        }],
        ..Collection::default()
    };
    let output = format_console_report(&collection, Path::new("out.md"));
    assert!(output.contains("\u{2713} PASS"));
    assert!(output.contains("[SKIP] T/run2/results.xml: no root element found"));
    assert!(output.contains("1 skipped ==="));
}

// ============================================================================
// 6. JSON summary
// ============================================================================

#[test]
fn json_summary_fields() {
    let json = generate_json_summary(
        &one_failure_collection(),
        PathBuf::from("out.md"),
        fixed_time(),
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["totals"]["tests"], 5);
    assert_eq!(value["passed"], 4);
    assert_eq!(value["success_rate"], 80.0);
    assert_eq!(value["dashboard"], "out.md");
    assert_eq!(value["failures"][0]["name"], "HeatPump_Curves");
    assert_eq!(value["failures"][0]["run"], "run1");
    assert_eq!(value["skipped_files"].as_array().unwrap().len(), 0);
    assert_eq!(value["generated"], "2024-03-05T07:08:09Z");
}
