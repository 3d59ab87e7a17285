//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// The taxonomy matters for callers: `Validation` and `Authorization` are
/// terminal (no retry), `Upstream` is a best-effort warning (local state is
/// kept), `Parse` carries the diagnostics an operator needs to fix the file.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Parse error: {message} ({rows_read} rows read, headers: {})", .headers.join(", "))]
    Parse {
        message: String,
        rows_read: usize,
        headers: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an authorization error
    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    /// Create an upstream error
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create a parse error with diagnostic context
    pub fn parse(msg: impl Into<String>, rows_read: usize, headers: Vec<String>) -> Self {
        Self::Parse {
            message: msg.into(),
            rows_read,
            headers,
        }
    }

    /// Whether the caller may keep local state and treat this as a warning
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_diagnostics() {
        let err = Error::parse(
            "no matching rows",
            42,
            vec!["월".to_string(), "매출".to_string()],
        );
        let msg = err.to_string();
        assert!(msg.contains("42 rows read"));
        assert!(msg.contains("월"));
    }

    #[test]
    fn test_only_upstream_is_recoverable() {
        assert!(Error::upstream("timeout").is_recoverable());
        assert!(!Error::validation("bad file").is_recoverable());
        assert!(!Error::authorization("bad pin").is_recoverable());
    }
}
