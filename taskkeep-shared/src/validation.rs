//! Input validation helpers
//!
//! Input structs derive [`validator::Validate`]. [`validate_input`] runs the
//! derived rules and flattens any failures into [`FieldViolation`]s sorted by
//! field name, so responses are stable across runs.

use validator::{Validate, ValidationErrors};

use crate::error::{FieldViolation, ServiceError, ServiceResult};

/// Runs the derived validation rules on `input`
pub fn validate_input<T: Validate>(input: &T) -> ServiceResult<()> {
    input
        .validate()
        .map_err(|errors| ServiceError::Validation(violations(&errors)))
}

/// Flattens field errors into sorted violations
pub fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, error.code));
                FieldViolation::new(field.to_string(), message)
            })
        })
        .collect();

    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}
