//! Transport-agnostic results produced by the domain layer.

use super::arithmetic::Number;
use super::operation::Operation;

/// A validated and evaluated calculation.
#[derive(Debug, Clone, Copy)]
pub struct Calculation {
    pub operation: Operation,
    pub x: Number,
    pub y: Number,
    pub result: Number,
}

/// Outcome of a state write: the value that was replaced and the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub previous: Option<String>,
    pub current: String,
}
