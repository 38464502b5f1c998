use thiserror::Error;

/// Errors that abort a normalizer run.
///
/// Per-record problems (unparseable dates, malformed metrics) are not
/// errors; those records are dropped with a diagnostic.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// No header matched any known candidate for a logical column.
    #[error("missing expected column for {field}; tried {candidates:?}")]
    MissingColumn {
        field: &'static str,
        candidates: &'static [&'static str],
    },

    /// Transport-level failure talking to the forecast API.
    #[error("network error: {0}")]
    Network(String),

    /// The forecast API answered with a non-success status.
    #[error("forecast api returned status {status}: {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
