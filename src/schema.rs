// Shape Layer - field declarations and required-field validation
// Every entity declares its fields once; the validator checks them against
// the serialized record before anything reaches the store.

use crate::entities::Entity;
use serde_json::Value;

// ============================================================================
// FIELD DECLARATIONS
// ============================================================================

/// Declared shape of one entity field (JSON name + presence rule)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str) -> Self {
        FieldSpec { name, required: true }
    }

    pub const fn optional(name: &'static str) -> Self {
        FieldSpec { name, required: false }
    }
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub context: String,
}

impl ValidationError {
    pub fn new(context: &str, field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
            context: context.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

// ============================================================================
// SCHEMA VALIDATOR
// ============================================================================

pub struct SchemaValidator;

impl SchemaValidator {
    /// Check every declared-required field of `entity` is present and non-null.
    ///
    /// Serialization failures are reported against the whole record, since a
    /// record that cannot be rendered as JSON cannot be stored either.
    pub fn validate<E: Entity>(entity: &E) -> ValidationResult {
        let document = match serde_json::to_value(entity) {
            Ok(value) => value,
            Err(e) => {
                return Err(vec![ValidationError::new(
                    E::NAME,
                    "*",
                    format!("Record cannot be serialized: {}", e),
                )])
            }
        };

        let errors: Vec<ValidationError> = E::FIELDS
            .iter()
            .filter(|spec| spec.required)
            .filter(|spec| matches!(document.get(spec.name), None | Some(Value::Null)))
            .map(|spec| ValidationError::new(E::NAME, spec.name, "NotNull"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Whether `field` may be used in a sort order for `E`
    pub fn is_sortable<E: Entity>(field: &str) -> bool {
        field == "id" || E::FIELDS.iter().any(|spec| spec.name == field)
    }
}
