use serde::Serialize;

use crate::types::DbId;

/// A single rejected field on a write payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    InvalidFields(Vec<FieldViolation>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldViolation {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid ({})", e.code)),
                })
            })
            .collect();
        // HashMap iteration order is unstable; keep responses deterministic.
        violations.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
        CoreError::InvalidFields(violations)
    }
}
