//! Request validation for the calculation routes.

use super::error::DomainError;
use super::operation::Operation;

/// Checks the raw `operation` and `y` path segments.
///
/// Rules are applied in order: the operation must be known, then a `divide`
/// whose divisor is the literal string `"0"` is rejected. The divisor check
/// is textual on purpose: `"00"` or `"0.0"` pass and reach the arithmetic,
/// which yields a non-finite result.
///
/// # Errors
/// Returns [`DomainError::InvalidOperation`] or [`DomainError::DivisionByZero`].
pub fn validate(operation: &str, y: &str) -> Result<Operation, DomainError> {
    let op: Operation = operation
        .parse()
        .map_err(|_| DomainError::invalid_operation(operation))?;

    if op == Operation::Divide && y == "0" {
        return Err(DomainError::DivisionByZero);
    }

    Ok(op)
}
