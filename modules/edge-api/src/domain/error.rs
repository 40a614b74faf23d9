use thiserror::Error;

use super::store::StoreError;

/// Domain-level errors for the edge API.
///
/// The two validation variants carry the exact user-facing messages.
#[derive(Error, Debug)]
pub enum DomainError {
    /// The operation path segment is not one of the supported operations.
    #[error("Invalid operation.")]
    InvalidOperation { operation: String },

    /// A literal `0` divisor was supplied to `divide`.
    #[error("Please do not divide by 0.")]
    DivisionByZero,

    /// The state store could not be read or written.
    #[error("state store error: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    #[must_use]
    pub fn invalid_operation(operation: impl Into<String>) -> Self {
        Self::InvalidOperation {
            operation: operation.into(),
        }
    }
}
