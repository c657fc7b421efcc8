use std::path::PathBuf;

/// Fatal errors surfaced by the `render` command.
///
/// Per-file collection problems never reach this type; they are downgraded
/// to [`crate::report::report_model::SkippedFile`] entries by the collector.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Filesystem failure while creating the output directory or writing the dashboard
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Explicitly requested config file could not be read or parsed
    #[error("invalid config file {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// JSON summary serialization failed
    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DashboardError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reasons a single result file is excluded from aggregation.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("could not read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("file is not valid UTF-8")]
    Encoding,

    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("malformed attribute: {0}")]
    Attribute(String),

    #[error("mismatched closing tag </{found}>, expected </{expected}>")]
    MismatchedTag { expected: String, found: String },

    #[error("unclosed element <{0}>")]
    Unclosed(String),

    #[error("no root element found")]
    NoRoot,

    #[error("content outside the root element")]
    TrailingContent,

    #[error("counters overflow the running totals")]
    CounterOverflow,

    #[error("attribute {attribute}=\"{value}\" on <{element}> is not an integer")]
    BadCounter {
        element: String,
        attribute: String,
        value: String,
    },
}
