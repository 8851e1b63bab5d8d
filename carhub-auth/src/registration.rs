//! Sign-up form validation.

use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// A sign-up request with surrounding whitespace removed from every field.
#[derive(Debug, Clone, Validate)]
pub struct Registration {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[validate(email(message = "must be a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Per-field messages, `{ "email": ["must be a valid email"] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationError {
    pub errors: Value,
}

impl RegistrationError {
    fn empty() -> Self {
        Self {
            errors: Value::Object(Map::new()),
        }
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        if let Value::Object(map) = &mut self.errors {
            let entry = map
                .entry(field.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(messages) = entry {
                messages.push(Value::from(message.into()));
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.errors.as_object().map_or(true, Map::is_empty)
    }

    /// Messages recorded for `field`.
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.errors
            .get(field)
            .and_then(Value::as_array)
            .map(|msgs| msgs.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.get(field).is_some()
    }

    /// Fields with at least one message, sorted.
    pub fn fields(&self) -> Vec<&str> {
        self.errors
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.errors)
    }
}

impl std::error::Error for RegistrationError {}

impl From<&ValidationErrors> for RegistrationError {
    fn from(errs: &ValidationErrors) -> Self {
        let mut out = Self::empty();
        for (field, kind) in errs.errors() {
            let ValidationErrorsKind::Field(field_errors) = kind else {
                continue;
            };
            for e in field_errors {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                out.push(field, message);
            }
        }
        out
    }
}

impl Registration {
    /// Trim every field and lower-case the email.
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password: password.trim().to_string(),
        }
    }

    /// Run the field rules, then the configured password length.
    pub fn checked(self, min_password_len: usize) -> Result<Self, RegistrationError> {
        let mut errors = match self.validate() {
            Ok(()) => RegistrationError::empty(),
            Err(e) => RegistrationError::from(&e),
        };
        if !errors.has_field("password") && self.password.chars().count() < min_password_len {
            errors.push(
                "password",
                format!("must be at least {min_password_len} characters"),
            );
        }

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(errors)
        }
    }
}
