use thiserror::Error;
use uuid::Uuid;

/// Errors raised around the calculator: factor lookup, storage, and config.
///
/// The calculator itself never returns one of these.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("unknown fuel type: {0}")]
    UnknownFuelType(String),
    #[error("unknown grid region: {0}")]
    UnknownGridRegion(String),
    #[error("unknown activity field: {0}")]
    UnknownField(String),
    #[error("audit record not found: {0}")]
    NotFound(Uuid),
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}
