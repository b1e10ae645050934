use thiserror::Error;

/// Fatal conditions of the discovery pipeline. "Not ready yet" outcomes are
/// never errors; they are reported as `None` by the ports.
#[derive(Debug, Error)]
pub enum GachaError {
    #[error("failed to read log file {path}: {source}")]
    LogUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed query segment {0:?}")]
    MalformedQuery(String),
    #[error("credentials are not set")]
    MissingCredentials,
    #[error("record server unavailable for pool {pool_type}: {status}")]
    ServerUnavailable { pool_type: u32, status: String },
    #[error("invalid record response for pool {pool_type}: {reason}")]
    InvalidResponse { pool_type: u32, reason: String },
    #[error("invalid pull time {0:?}")]
    InvalidTimestamp(String),
    #[error("background task failed: {0}")]
    Task(String),
}
