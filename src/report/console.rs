use std::path::Path;

use crate::report::report_model::Collection;

// ============================================================================
// Console reporter — short terminal summary
// ============================================================================

/// Format a collection for terminal output.
///
/// Produces output like:
/// ```text
/// === Test Dashboard: 3 run(s), 1 skipped ===
///
/// ✗ FAIL  MathTests.divide_by_zero (run2)
///
/// === Results: 41 passed, 1 failed, 0 errors, 2 skipped (44 total, 93.2%) ===
/// Dashboard: Testing/dashboard/test-dashboard.md
/// ```
pub fn format_console_report(collection: &Collection, dashboard: &Path) -> String {
    let totals = &collection.totals;
    let mut out = String::new();

    out.push_str(&format!(
        "=== Test Dashboard: {} run(s), {} skipped ===\n\n",
        collection.files.len(),
        collection.skipped_files.len()
    ));

    if collection.all_passed() {
        out.push_str("\u{2713} PASS  no failing test cases\n");
    } else {
        for failure in &collection.failures {
            out.push_str(&format!(
                "\u{2717} FAIL  {}.{} ({})\n",
                failure.classname, failure.name, failure.run
            ));
        }
    }

    for skipped in &collection.skipped_files {
        out.push_str(&format!(
            "    [SKIP] {}: {}\n",
            skipped.path.display(),
            skipped.reason
        ));
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed, {} errors, {} skipped ({} total, {:.1}%) ===\n",
        totals.passed(),
        totals.failures,
        totals.errors,
        totals.skipped,
        totals.tests,
        totals.success_rate()
    ));
    out.push_str(&format!("Dashboard: {}\n", dashboard.display()));

    out
}
