use thiserror::Error;

/// Failure below the HTTP status line: DNS resolution, TLS, timeouts,
/// connections dropped mid-stream.
///
/// Transport failures are never classified further by connectors; they are
/// passed through unchanged so the caller sees the original cause.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport failure: {0}")]
    Other(String),
}

/// Uniform error contract every storage connector reports through.
///
/// Connectors classify each request boundary exactly once: an HTTP 401
/// becomes [`ConnectorError::Auth`] regardless of the response body, any
/// other non-2xx status becomes [`ConnectorError::Api`], and transport
/// failures are wrapped without modification. No retries happen at this
/// layer; resilience belongs to the caller.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Credential invalid or expired (HTTP 401). The caller must run its
    /// re-authentication flow before retrying anything.
    #[error("storage backend rejected the credentials")]
    Auth,

    /// Non-2xx response from the backend, with a best-effort message taken
    /// from the backend's structured error body when one is present.
    #[error("{message} (status {status_code})")]
    Api { status_code: u16, message: String },

    /// Connection-level failure, surfaced unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The backend answered 2xx but the body did not match the expected shape.
    #[error("malformed response from storage backend: {0}")]
    Decode(String),

    /// Operation the backend has no endpoint for.
    #[error("{0} is not supported by this storage backend")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
