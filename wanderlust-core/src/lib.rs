pub mod identity;
pub mod inquiry;
pub mod payment;

use serde::{Deserialize, Serialize};

pub use identity::{Authenticator, MockAuthenticator, SessionUser};
pub use payment::{CardDetails, PaymentMethod};

/// A single form field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, format!("{} is required", field))
    }
}

/// Field-level errors collected by a form validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("missing or invalid fields: {}", field_list(.0))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Records a `required` error when `value` is blank.
    pub fn require(&mut self, field: &str, value: &str) {
        if is_blank(value) {
            self.push(FieldError::required(field));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields().any(|f| f == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn field_list(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>().join(", ")
}

/// Form inputs count as empty when they hold only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_collects_blank_fields() {
        let mut errors = ValidationErrors::new();
        errors.require("first_name", "Ada");
        errors.require("last_name", "   ");
        errors.require("email", "");

        assert!(!errors.contains("first_name"));
        assert!(errors.contains("last_name"));
        assert!(errors.contains("email"));
        assert_eq!(errors.to_string(), "missing or invalid fields: last_name, email");
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.push(FieldError::required("phone"));
        let err = errors.into_result().unwrap_err();
        assert_eq!(err.errors()[0].message, "phone is required");
    }

    #[test]
    fn test_validation_errors_are_std_errors() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::required("card_number"));

        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(errors);
        assert_eq!(boxed.to_string(), "missing or invalid fields: card_number");
        assert!(boxed.source().is_none());
    }
}
