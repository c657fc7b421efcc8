use std::path::PathBuf;

use serde::Serialize;

use crate::error::ParseError;

// ============================================================================
// Parsed result files
// ============================================================================

/// One `run*/results.xml` file after parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRunResult {
    /// Name of the run directory, e.g. `run3`
    pub run: String,

    /// Suites in document order
    pub suites: Vec<TestSuiteResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestSuiteResult {
    pub name: String,
    pub tests: i64,
    pub failures: i64,
    pub errors: i64,
    pub skipped: i64,
    pub cases: Vec<TestCaseResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCaseResult {
    pub classname: String,
    pub name: String,

    /// First `<failure>` child, else first `<error>` child
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<FailureIndicator>,
}

/// The element that marked a test case as not passing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureIndicator {
    Failure { message: String, details: String },
    Error { message: String, details: String },
}

impl FailureIndicator {
    pub fn message(&self) -> &str {
        match self {
            FailureIndicator::Failure { message, .. } | FailureIndicator::Error { message, .. } => {
                message
            }
        }
    }

    pub fn details(&self) -> &str {
        match self {
            FailureIndicator::Failure { details, .. } | FailureIndicator::Error { details, .. } => {
                details
            }
        }
    }
}

impl TestRunResult {
    /// Project every failing case into a [`FailureRecord`], in document order.
    pub fn failure_records(&self) -> Vec<FailureRecord> {
        self.suites
            .iter()
            .flat_map(|suite| {
                suite.cases.iter().filter_map(move |case| {
                    let indicator = case.outcome.as_ref()?;
                    Some(FailureRecord {
                        suite: suite.name.clone(),
                        classname: case.classname.clone(),
                        name: case.name.clone(),
                        message: indicator.message().trim().to_string(),
                        details: indicator.details().trim().to_string(),
                        run: self.run.clone(),
                    })
                })
            })
            .collect()
    }
}

// ============================================================================
// Aggregated view consumed by the writers
// ============================================================================

/// Flattened view of one failing test case, used to render one report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub suite: String,
    pub classname: String,
    pub name: String,
    pub message: String,
    pub details: String,
    pub run: String,
}

/// Counters summed across every suite of every parsed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateTotals {
    pub tests: i64,
    pub failures: i64,
    pub errors: i64,
    pub skipped: i64,
}

impl AggregateTotals {
    /// Totals with `suite` added, or `None` if any counter leaves the `i64` range.
    pub fn checked_add_suite(&self, suite: &TestSuiteResult) -> Option<Self> {
        Some(Self {
            tests: self.tests.checked_add(suite.tests)?,
            failures: self.failures.checked_add(suite.failures)?,
            errors: self.errors.checked_add(suite.errors)?,
            skipped: self.skipped.checked_add(suite.skipped)?,
        })
    }

    /// `tests - failures - errors`. Not clamped: inconsistent input can make this negative.
    ///
    /// Widened to `i128` so any combination of `i64` counters is representable.
    pub fn passed(&self) -> i128 {
        i128::from(self.tests) - i128::from(self.failures) - i128::from(self.errors)
    }

    /// Percentage of passing tests, or 0.0 when no tests were counted.
    pub fn success_rate(&self) -> f64 {
        if self.tests > 0 {
            self.passed() as f64 / self.tests as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// A discovered file that contributed nothing to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything the collector found under one testing root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collection {
    /// Discovered result files, sorted lexicographically by path
    pub files: Vec<PathBuf>,

    pub totals: AggregateTotals,

    /// Failing cases in file order, then document order
    pub failures: Vec<FailureRecord>,

    /// Files excluded from aggregation and why
    pub skipped_files: Vec<SkippedFile>,
}

impl Collection {
    /// Fold one parsed run into the totals and failure list.
    ///
    /// All or nothing: if the run would overflow a counter, the collection is
    /// left untouched and the run is rejected like any other malformed file.
    pub fn absorb(&mut self, run: &TestRunResult) -> Result<(), ParseError> {
        let mut totals = self.totals;
        for suite in &run.suites {
            totals = totals
                .checked_add_suite(suite)
                .ok_or(ParseError::CounterOverflow)?;
        }
        self.totals = totals;
        self.failures.extend(run.failure_records());
        Ok(())
    }

    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Name of the directory that holds a result file, e.g. `run3` for `Testing/run3/results.xml`.
pub fn run_name(path: &std::path::Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
