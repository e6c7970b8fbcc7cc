use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use super::json_response;
use crate::core::{SimulationError, ValidationError, ValidationErrors};

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Vec<ValidationError>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    details: &'a [ValidationError],
}

impl ApiError {
    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Request validation failed".to_string(),
            details: errors.errors().to_vec(),
        }
    }

    pub fn malformed_body(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Request body is not a valid simulation request".to_string(),
            details: vec![ValidationError::new("body", rejection.body_text())],
        }
    }

    pub fn internal(context: &str, err: &SimulationError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{context} failed: {err}"),
            details: Vec::new(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Not found".to_string(),
            details: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn details(&self) -> &[ValidationError] {
        &self.details
    }

    pub(super) fn from_simulation(context: &str, err: SimulationError) -> Self {
        match err {
            SimulationError::Validation(errors) => Self::validation(errors),
            other => Self::internal(context, &other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.message,
            details: &self.details,
        };
        json_response(self.status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_unprocessable_entity_with_fields() {
        let mut errors = ValidationErrors::default();
        errors.push("scenario", "unknown scenario 'x'");

        let err = ApiError::validation(errors);

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.details()[0].field, "scenario");
    }

    #[test]
    fn non_finite_state_maps_to_internal_error_with_cause() {
        let err = ApiError::from_simulation(
            "Simulation",
            SimulationError::NonFiniteState {
                month: 3,
                field: "cumulative_savings",
            },
        );

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Simulation failed: month 3: cumulative_savings is not a finite number"
        );
    }
}
