use thiserror::Error;

/// Errors raised while persisting or delivering the flat table.
///
/// These are fatal to the run; the in-memory table is still considered
/// correctly computed when one occurs.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("payload serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The downstream consumer refused or failed to accept the table.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;
