use crate::schema::ValidationError;
use thiserror::Error;

/// Failure of one CRUD operation.
///
/// A missing record is not an error: lookups return `Option`.
#[derive(Debug, Error)]
pub enum CrudError {
    /// Caller-fixable input; nothing was written
    #[error("invalid {entity} ({key}): {}", summarize(.errors))]
    Validation {
        entity: &'static str,
        key: &'static str,
        errors: Vec<ValidationError>,
    },

    #[error("store failure: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl CrudError {
    pub fn validation(entity: &'static str, key: &'static str, errors: Vec<ValidationError>) -> Self {
        CrudError::Validation { entity, key, errors }
    }

    /// Stable message key, e.g. `error.idexists`
    pub fn message_key(&self) -> String {
        match self {
            CrudError::Validation { key, .. } => format!("error.{}", key),
            CrudError::Store(_) => "error.internalServerError".to_string(),
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type CrudResult<T> = Result<T, CrudError>;
