//! Error taxonomy shared by every crate in the workspace.
//!
//! Every failure a request can hit maps onto one of these variants; the web
//! adapter converts them to an HTTP status and a rendered page at the
//! request boundary.

use thiserror::Error;

/// A single field-level validation message, e.g. `("username", "taken")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulated form validation failures.
///
/// Services collect all field errors before failing so a re-rendered form
/// can show every problem at once, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single-field failure.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut v = Self::new();
        v.push(field, message);
        v
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Messages attached to a specific field.
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// `Ok(())` when no errors were collected, otherwise the validation error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

/// The primary error type for all Inkwell operations.
#[derive(Error, Debug, PartialEq)]
pub enum AppError {
    /// Bad form input. The handler re-renders the form with field errors.
    #[error("validation error: {0}")]
    Validation(ValidationErrors),

    /// No authenticated session. Rendered as a redirect to the login page.
    #[error("authentication required")]
    AuthenticationRequired,

    /// Authenticated but not allowed (ownership or staff gate).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Unknown entity id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Datastore constraint violation, e.g. duplicate username.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (DB down, filesystem error).
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// A specialized Result type for Inkwell logic.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_multiple_field_errors() {
        let mut v = ValidationErrors::new();
        v.push("username", "too short");
        v.push("password", "too short");
        v.push("username", "invalid characters");

        assert_eq!(v.for_field("username").len(), 2);
        assert_eq!(v.for_field("password"), vec!["too short"]);
        assert!(v.for_field("email").is_empty());
    }

    #[test]
    fn empty_errors_resolve_ok() {
        assert_eq!(ValidationErrors::new().into_result(), Ok(()));
    }

    #[test]
    fn non_empty_errors_become_validation() {
        let err = ValidationErrors::single("title", "required")
            .into_result()
            .unwrap_err();
        match err {
            AppError::Validation(v) => assert_eq!(v.for_field("title"), vec!["required"]),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
