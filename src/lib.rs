//! Markdown dashboard for CTest JUnit XML results.
//!
//! Reads every `run*/results.xml` under a testing directory, sums the suite
//! counters, collects failing test cases, and writes
//! `dashboard/test-dashboard.md`. See [`report::collector::collect_results`]
//! and [`report::markdown::render_markdown`].

pub mod cli;
pub mod error;
pub mod logging;
pub mod report;
