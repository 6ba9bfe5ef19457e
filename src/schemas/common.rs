//! Shared request/response pieces: pagination, message bodies and field validators.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::error::{ApiError, RepositoryError, validation_error};

/// Body returned by deletes that acknowledge with a message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Row deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Default and maximum page size of one list endpoint
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default: u64,
    pub max: u64,
}

impl PageLimits {
    pub const fn new(default: u64, max: u64) -> Self {
        Self { default, max }
    }
}

/// Validated `limit`/`offset` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    /// Applies the endpoint's default and rejects `limit` outside `1..=max` or a negative offset.
    pub fn resolve(
        limit: Option<i64>,
        offset: Option<i64>,
        limits: PageLimits,
    ) -> Result<Self, ApiError> {
        let limit = limit.unwrap_or(limits.default as i64);
        if limit < 1 || limit > limits.max as i64 {
            return Err(validation_error(
                &format!("limit must be between 1 and {}", limits.max),
                json!({"field": "limit", "value": limit, "max": limits.max}),
            ));
        }

        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(validation_error(
                "offset cannot be negative",
                json!({"field": "offset", "value": offset}),
            ));
        }

        Ok(Self {
            limit: limit as u64,
            offset: offset as u64,
        })
    }
}

/// Trims `value` and rejects it when nothing is left.
pub fn require_text(value: &str, field: &str) -> Result<String, RepositoryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RepositoryError::validation_error(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Rejects `value` unless it is one of `allowed`.
pub fn require_choice(value: &str, allowed: &[&str], field: &str) -> Result<(), RepositoryError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(RepositoryError::validation_error(format!(
            "Invalid {field} '{value}'; expected one of: {}",
            allowed.join(", ")
        )))
    }
}

/// Rejects a JSON value that is not an object.
pub fn require_object(value: &Value, field: &str) -> Result<(), RepositoryError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(RepositoryError::validation_error(format!(
            "{field} must be a JSON object"
        )))
    }
}

pub(crate) fn empty_object() -> Value {
    Value::Object(Default::default())
}

pub(crate) fn empty_array() -> Value {
    Value::Array(Vec::new())
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    const LIMITS: PageLimits = PageLimits::new(100, 500);

    #[test]
    fn page_defaults_apply() {
        let page = Page::resolve(None, None, LIMITS).unwrap();
        assert_eq!(page, Page { limit: 100, offset: 0 });
    }

    #[test]
    fn page_rejects_out_of_range_values() {
        for (limit, offset) in [(Some(0), None), (Some(501), None), (None, Some(-1))] {
            let error = Page::resolve(limit, offset, LIMITS).unwrap_err();
            assert_eq!(error.status, StatusCode::BAD_REQUEST);
            assert_eq!(&*error.code, "VALIDATION_FAILED");
        }
        assert!(Page::resolve(Some(500), Some(10), LIMITS).is_ok());
    }

    #[test]
    fn text_and_choice_validation() {
        assert_eq!(require_text("  Guests ", "name").unwrap(), "Guests");
        assert!(require_text("   ", "name").is_err());
        assert!(require_choice("grid", &["grid", "kanban"], "view_type").is_ok());
        assert!(require_choice("pie", &["grid", "kanban"], "view_type").is_err());
        assert!(require_object(&json!([1]), "data").is_err());
    }
}
