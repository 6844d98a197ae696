//! Error types for the accountfacts reporting library.

/// Top-level error enum for the accountfacts reporting library.
///
/// Every error is fatal for the run; nothing is recovered locally and
/// nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error querying {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Empty response from {url}: the query matched no facts")]
    EmptyResponse { url: String },

    #[error("missing field `{field}` at slot {slot} on machine {node}")]
    MissingField {
        field: &'static str,
        slot: u64,
        node: String,
    },

    #[error("malformed value for field `{field}` at slot {slot} on machine {node}: {reason}")]
    MalformedField {
        field: &'static str,
        slot: u64,
        node: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
