use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DashboardError;
use crate::report::report_model::{AggregateTotals, Collection, FailureRecord, SkippedFile};

/// Machine-readable twin of the markdown dashboard.
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub generated: DateTime<Utc>,
    pub dashboard: PathBuf,
    pub totals: AggregateTotals,
    pub passed: i128,
    /// Rounded to one decimal place, matching the dashboard
    pub success_rate: f64,
    pub files: &'a [PathBuf],
    pub failures: &'a [FailureRecord],
    pub skipped_files: &'a [SkippedFile],
}

impl<'a> JsonSummary<'a> {
    pub fn new(collection: &'a Collection, dashboard: PathBuf, generated: DateTime<Utc>) -> Self {
        let totals = collection.totals;
        Self {
            generated,
            dashboard,
            totals,
            passed: totals.passed(),
            success_rate: (totals.success_rate() * 10.0).round() / 10.0,
            files: &collection.files,
            failures: &collection.failures,
            skipped_files: &collection.skipped_files,
        }
    }
}

/// Pretty-printed JSON summary.
pub fn generate_json_summary(
    collection: &Collection,
    dashboard: PathBuf,
    generated: DateTime<Utc>,
) -> Result<String, DashboardError> {
    let summary = JsonSummary::new(collection, dashboard, generated);
    Ok(serde_json::to_string_pretty(&summary)?)
}
