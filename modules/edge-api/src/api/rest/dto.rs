use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::arithmetic::Number;
use crate::domain::models::{Calculation, StateTransition};

/// Result of an arithmetic request.
#[derive(Debug, Serialize, ToSchema)]
pub struct CalculationDto {
    /// Integral results are JSON integers; non-finite results are `null`.
    #[schema(value_type = Option<f64>)]
    pub data: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl CalculationDto {
    #[must_use]
    pub fn new(calculation: &Calculation, source: Option<&str>) -> Self {
        Self {
            data: calculation.result,
            source: source.map(ToOwned::to_owned),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStateRequest {
    pub value: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StateTransitionDto {
    pub previous: Option<String>,
    #[serde(rename = "new")]
    pub new_value: String,
}

impl From<StateTransition> for StateTransitionDto {
    fn from(t: StateTransition) -> Self {
        Self {
            previous: t.previous,
            new_value: t.current,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StateValueDto {
    pub value: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthDto {
    #[schema(value_type = String)]
    pub data: &'static str,
}
