//! Unified error types for squirrel.

use tokio_rusqlite::rusqlite;

/// Unified error types for the cache agent and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or unresolvable URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network transport failure (offline, DNS failure, refused connection).
    #[error("OFFLINE: {0}")]
    Offline(String),

    /// Response body exceeds the configured byte cap.
    #[error("FETCH_TOO_LARGE: {0}")]
    TooLarge(String),

    /// Response excluded from caching (non-200 or opaque/error type).
    #[error("NOT_CACHEABLE: status {status}")]
    NotCacheable { status: u16 },

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Entry could not be encoded for storage.
    #[error("STORE_ERROR: encode failed: {0}")]
    Encode(String),

    /// Stored entry could not be decoded.
    #[error("STORE_ERROR: corrupt entry: {0}")]
    CorruptEntry(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Offline("dns lookup failed".to_string());
        assert!(err.to_string().contains("OFFLINE"));
        assert!(err.to_string().contains("dns lookup failed"));
    }

    #[test]
    fn test_not_cacheable_display() {
        let err = Error::NotCacheable { status: 404 };
        assert_eq!(err.to_string(), "NOT_CACHEABLE: status 404");
    }
}
