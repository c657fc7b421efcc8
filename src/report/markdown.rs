use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::DashboardError;
use crate::report::report_model::{Collection, FailureRecord, run_name};

/// Directory under the testing root that receives the dashboard.
pub const DASHBOARD_DIR: &str = "dashboard";

/// Dashboard file name inside [`DASHBOARD_DIR`].
pub const DASHBOARD_FILE: &str = "test-dashboard.md";

/// Fence long enough that triple backticks inside test output cannot close it.
const FENCE: &str = "````";

/// Default dashboard location for a testing root: `<root>/dashboard/test-dashboard.md`.
pub fn default_dashboard_path(root: &Path) -> PathBuf {
    root.join(DASHBOARD_DIR).join(DASHBOARD_FILE)
}

// ============================================================================
// Markdown dashboard renderer
// ============================================================================

/// Render the dashboard document.
///
/// Pure apart from `generated`, which is the only line that differs between
/// two renders of the same collection.
pub fn render_markdown(collection: &Collection, generated: DateTime<Utc>) -> String {
    let totals = &collection.totals;
    let mut out = String::new();

    out.push_str("# Test Results Dashboard\n");
    out.push_str("| Metric | Value |\n");
    out.push_str("|--------|-------|\n");
    out.push_str(&format!("| Total Tests | {} |\n", totals.tests));
    out.push_str(&format!("| Passed | {} |\n", totals.passed()));
    out.push_str(&format!("| Failed | {} |\n", totals.failures));
    out.push_str(&format!("| Errors | {} |\n", totals.errors));
    out.push_str(&format!("| Skipped | {} |\n", totals.skipped));
    out.push_str(&format!("| Success Rate | {:.1}% |\n", totals.success_rate()));
    out.push_str(&format!(
        "| Generated | {} |\n\n",
        generated.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if collection.failures.is_empty() {
        out.push_str("## All Tests Passed\n\n");
    } else {
        out.push_str(&format!("## Failed Tests ({})\n\n", collection.failures.len()));
        for failure in &collection.failures {
            push_failure(&mut out, failure);
        }
    }

    out.push_str("## Test Runs\n\n");
    out.push_str("| Run | XML File | Status |\n");
    out.push_str("|-----|----------|--------|\n");
    if collection.files.is_empty() {
        out.push_str("| - | No XML files | Missing |\n");
    } else {
        for path in &collection.files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            out.push_str(&format!("| {} | `{}` | Present |\n", run_name(path), file_name));
        }
    }

    out
}

/// One collapsible section per failing test case.
fn push_failure(out: &mut String, failure: &FailureRecord) {
    out.push_str("<details>\n");
    out.push_str(&format!(
        "<summary><strong>{}.{}</strong> ({})</summary>\n\n",
        failure.classname, failure.name, failure.run
    ));
    if !failure.message.is_empty() {
        out.push_str("**Message:**\n");
        out.push_str(&format!("{FENCE}\n{}\n{FENCE}\n\n", failure.message));
    }
    if !failure.details.is_empty() {
        out.push_str("**Details:**\n");
        out.push_str(&format!("{FENCE}\n{}\n{FENCE}\n\n", failure.details));
    }
    out.push_str("</details>\n\n");
}

/// Render and write the dashboard to `output`, creating parent directories.
///
/// The file is replaced wholesale on every call.
pub fn write_dashboard(
    output: &Path,
    collection: &Collection,
    generated: DateTime<Utc>,
) -> Result<String, DashboardError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DashboardError::io(parent, e))?;
    }

    let document = render_markdown(collection, generated);
    fs::write(output, &document).map_err(|e| DashboardError::io(output, e))?;
    info!(path = %output.display(), bytes = document.len(), "wrote dashboard");
    Ok(document)
}
