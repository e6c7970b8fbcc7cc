use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field problem found in one request, reported together.
#[derive(Debug, Clone, Default, PartialEq, Error)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.0.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(value: ValidationError) -> Self {
        Self(vec![value])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid simulation input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("month {month}: {field} is not a finite number")]
    NonFiniteState { month: u32, field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_join_every_field() {
        let mut errors = ValidationErrors::default();
        errors.push("projection_months", "must be between 1 and 120");
        errors.push("goals[0].deadline", "must be a YYYY-MM-DD date");

        let text = errors.to_string();
        assert_eq!(
            text,
            "projection_months: must be between 1 and 120; goals[0].deadline: must be a YYYY-MM-DD date"
        );
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn empty_validation_errors_pass_value_through() {
        assert_eq!(ValidationErrors::default().into_result(7), Ok(7));
    }
}
