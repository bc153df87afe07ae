use thiserror::Error;

use super::config::FORM_LIMITS;

/// Rejection of a profile that cannot be computed on.
///
/// Field names are the camelCase keys the form layer uses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} {reason}")]
    OutOfRange { field: &'static str, reason: String },
    #[error("{field} ({value}) must be {relation} {other_field} ({other_value})")]
    AgeOrder {
        field: &'static str,
        value: u32,
        relation: &'static str,
        other_field: &'static str,
        other_value: u32,
    },
    #[error(
        "no retirement years: retirementAge ({retirement_age}) must be < lifeExpectancy ({life_expectancy})"
    )]
    NoRetirementYears {
        retirement_age: u32,
        life_expectancy: u32,
    },
}

impl ProfileError {
    pub fn field(&self) -> &'static str {
        match self {
            ProfileError::MissingField { field }
            | ProfileError::OutOfRange { field, .. }
            | ProfileError::AgeOrder { field, .. } => field,
            ProfileError::NoRetirementYears { .. } => "lifeExpectancy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    #[error("{field} must be a finite, non-negative amount")]
    InvalidAmount { field: String },
}

pub(crate) fn out_of_range(field: &'static str, reason: impl Into<String>) -> ProfileError {
    ProfileError::OutOfRange {
        field,
        reason: reason.into(),
    }
}

pub(crate) fn require<T: Copy>(value: Option<T>, field: &'static str) -> Result<T, ProfileError> {
    value.ok_or(ProfileError::MissingField { field })
}

pub(crate) fn require_age(value: Option<u32>, field: &'static str) -> Result<u32, ProfileError> {
    let age = require(value, field)?;
    check_age(age, field)
}

/// Ages past the form ceiling would stretch the yearly loops without bound.
pub(crate) fn check_age(age: u32, field: &'static str) -> Result<u32, ProfileError> {
    if age > FORM_LIMITS.max_age {
        return Err(out_of_range(
            field,
            format!("must be at most {}", FORM_LIMITS.max_age),
        ));
    }
    Ok(age)
}

pub(crate) fn require_amount(value: Option<f64>, field: &'static str) -> Result<f64, ProfileError> {
    let value = require(value, field)?;
    check_amount(value, field)
}

pub(crate) fn check_amount(value: f64, field: &'static str) -> Result<f64, ProfileError> {
    if !value.is_finite() || value < 0.0 {
        return Err(out_of_range(field, "must be a finite value >= 0"));
    }
    Ok(value)
}
