//! Storage seam for the current-value state.
//!
//! The state handler only ever talks to a [`StateStore`]. Production wires
//! the remote key-value client, tests and the degraded deployment wire the
//! in-memory store.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Key under which the single current value is kept.
pub const STATE_KEY: &str = "stateValue";

/// Failures talking to a state store.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// The store client could not be constructed from its configuration
    #[error("invalid store configuration: {0}")]
    Configuration(String),

    /// The outbound request could not be built
    #[error("failed to build store request: {0}")]
    Request(String),

    /// Network, connection or protocol failure
    #[error("store transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The store did not answer within the client timeout
    #[error("store request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The store answered with a non-success status
    #[error("store responded with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The store answered with a body we could not interpret
    #[error("malformed store response: {0}")]
    Malformed(String),

    /// A stored value was not valid percent-encoded UTF-8
    #[error("stored value could not be decoded: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

/// Key-value access used by the state handler.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Returns the value stored under `key`, `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug)]
    struct Refused;

    impl std::fmt::Display for Refused {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("connection refused")
        }
    }

    impl std::error::Error for Refused {}

    #[test]
    fn transport_error_keeps_source() {
        let err = StoreError::Transport(Box::new(Refused));
        assert_eq!(err.to_string(), "store transport error: connection refused");
        assert!(err.source().is_some());
    }

    #[test]
    fn status_error_display() {
        let err = StoreError::Status {
            status: 401,
            message: "Unauthorized".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "store responded with HTTP 401: Unauthorized"
        );
    }
}
