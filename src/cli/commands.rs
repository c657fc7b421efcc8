use chrono::Utc;
use tracing::debug;

use crate::cli::config::{OutputFormat, RenderOptions};
use crate::error::DashboardError;
use crate::report::collector::collect_results;
use crate::report::console::format_console_report;
use crate::report::json::generate_json_summary;
use crate::report::markdown::write_dashboard;
use crate::report::report_model::Collection;

// ============================================================================
// render command
// ============================================================================

/// Collect results under `options.root`, write the dashboard, and return what
/// should be printed on stdout for the chosen format.
///
/// Test failures are not errors; only a failed write is.
pub fn cmd_render(options: &RenderOptions) -> Result<(Collection, String), DashboardError> {
    debug!(
        root = %options.root.display(),
        output = %options.output.display(),
        format = ?options.format,
        "rendering dashboard"
    );

    let collection = collect_results(&options.root);
    let generated = Utc::now();
    let document = write_dashboard(&options.output, &collection, generated)?;

    let stdout = match options.format {
        OutputFormat::Console => format_console_report(&collection, &options.output),
        OutputFormat::Markdown => document,
        OutputFormat::Json => {
            let mut json = generate_json_summary(&collection, options.output.clone(), generated)?;
            json.push('\n');
            json
        }
    };

    Ok((collection, stdout))
}
