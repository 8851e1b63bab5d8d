use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Area code plus nine digits, optionally separated by one space.
static WHATSAPP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2,3} ?\d{9}$").expect("whatsapp pattern compiles"));

/// The "new listing" form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ListingDraft {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "model is required"))]
    pub model: String,
    #[validate(length(min = 1, message = "year is required"))]
    pub year: String,
    #[validate(length(min = 1, message = "km is required"))]
    pub km: String,
    #[validate(length(min = 1, message = "price is required"))]
    pub price: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(regex(path = *WHATSAPP, message = "whatsapp must be an area code followed by nine digits"))]
    pub whatsapp: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
}

/// Per-field validation failures, `{"field": ["message", ...]}`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Listing draft is invalid: {errors}")]
pub struct DraftError {
    pub errors: Value,
}

impl DraftError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(field.to_string(), Value::from(vec![message.into()]));
        Self {
            errors: Value::Object(map),
        }
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
}

impl From<&ValidationErrors> for DraftError {
    fn from(errs: &ValidationErrors) -> Self {
        let mut map = Map::new();
        for (field, kind) in errs.errors() {
            let ValidationErrorsKind::Field(field_errors) = kind else {
                continue;
            };
            let messages: Vec<Value> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                        .into()
                })
                .collect();
            map.insert(field.to_string(), Value::Array(messages));
        }
        Self {
            errors: Value::Object(map),
        }
    }
}

impl ListingDraft {
    /// Copy with surrounding whitespace removed from every field.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            model: self.model.trim().to_string(),
            year: self.year.trim().to_string(),
            km: self.km.trim().to_string(),
            price: self.price.trim().to_string(),
            city: self.city.trim().to_string(),
            whatsapp: self.whatsapp.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }

    /// Normalize, then validate every field.
    pub fn checked(&self) -> Result<Self, DraftError> {
        let draft = self.normalized();
        draft.validate().map_err(|e| DraftError::from(&e))?;
        Ok(draft)
    }
}
