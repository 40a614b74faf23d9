//! Stateless arithmetic over raw path segments.

use tracing::debug;

use super::arithmetic::parse_int_prefix;
use super::error::DomainError;
use super::models::Calculation;
use super::validation::validate;

/// Validates the request and evaluates it.
///
/// Operands that do not parse become not-a-number and propagate into the
/// result; they are not reported as errors.
///
/// # Errors
/// Returns a validation [`DomainError`] when the operation is unknown or the
/// divisor is the literal `"0"`.
pub fn calculate(operation: &str, x: &str, y: &str) -> Result<Calculation, DomainError> {
    let operation = validate(operation, y)?;
    let (x, y) = (parse_int_prefix(x), parse_int_prefix(y));
    let result = operation.apply(x, y);

    debug!(
        %operation,
        x = x.value(),
        y = y.value(),
        result = result.value(),
        "calculation evaluated"
    );

    Ok(Calculation {
        operation,
        x,
        y,
        result,
    })
}
