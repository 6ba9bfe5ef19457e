//! # Error Handling
//!
//! Unified error handling for the workspace hub API: a problem+json [`ApiError`] returned by
//! every handler and the tagged [`RepositoryError`] produced by the data access layer.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::telemetry;

/// Unified API error response structure
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    /// HTTP status code for the response
    #[serde(skip_serializing, skip_deserializing)]
    pub status: StatusCode,
    /// Error code for programmatic handling
    pub code: Box<str>,
    /// Human-readable error message
    pub message: Box<str>,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Box<serde_json::Value>>,
    /// Correlation trace ID for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<Box<str>>,
}

impl ApiError {
    /// Create a new API error with the given status code and message
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into().into_boxed_str(),
            message: message.into().into_boxed_str(),
            details: None,
            trace_id: Self::current_trace_id(),
        }
    }

    /// Add details to the error
    pub fn with_details<V: Into<serde_json::Value>>(mut self, details: V) -> Self {
        self.details = Some(Box::new(details.into()));
        self
    }

    /// Trace ID of the current request, or a generated correlation ID outside of one
    fn current_trace_id() -> Option<Box<str>> {
        telemetry::current_trace_id()
            .map(|trace_id| trace_id.into_boxed_str())
            .or_else(|| {
                Some(format!("corr-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]).into_boxed_str())
            })
    }
}

fn is_unique_violation(error: &sea_orm::DbErr) -> bool {
    use sea_orm::RuntimeErr;

    const PG_UNIQUE: &str = "23505";
    const SQLITE_DUPLICATE_CODES: &[&str] = &["1555", "2067"];

    let runtime_err = match error {
        sea_orm::DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | sea_orm::DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = runtime_err.as_database_error() else {
        return false;
    };

    if db_error.is_unique_violation() {
        return true;
    }

    db_error
        .code()
        .is_some_and(|code| code == PG_UNIQUE || SQLITE_DUPLICATE_CODES.contains(&code.as_ref()))
}

/// Standard error types with predefined status codes
#[derive(Debug, Error)]
pub enum ErrorType {
    #[error("Bad Request")]
    BadRequest,
    #[error("Not Found")]
    NotFound,
    #[error("Conflict")]
    Conflict,
    #[error("Internal Server Error")]
    InternalServerError,
    #[error("Not Implemented")]
    NotImplemented,
    #[error("Service Unavailable")]
    ServiceUnavailable,
}

impl ErrorType {
    /// Get the appropriate HTTP status code for this error type
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorType::BadRequest => StatusCode::BAD_REQUEST,
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::Conflict => StatusCode::CONFLICT,
            ErrorType::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            ErrorType::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the SCREAMING_SNAKE_CASE error code string for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorType::BadRequest => "VALIDATION_FAILED",
            ErrorType::NotFound => "NOT_FOUND",
            ErrorType::Conflict => "CONFLICT",
            ErrorType::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorType::NotImplemented => "NOT_IMPLEMENTED",
            ErrorType::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Build an [`ApiError`] of this type with a specific message
    pub fn with_message(self, message: impl Into<String>) -> ApiError {
        ApiError::new(self.status_code(), self.error_code(), message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/problem+json"),
        );

        (self.status, headers, axum::Json(self)).into_response()
    }
}

impl From<ErrorType> for ApiError {
    fn from(error_type: ErrorType) -> Self {
        let message = error_type.to_string();
        error_type.with_message(message)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:?}", error);

        ErrorType::InternalServerError.with_message("An internal error occurred")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON: {}", err.body_text()),
            JsonRejection::JsonSyntaxError(err) => {
                format!("JSON syntax error: {}", err.body_text())
            }
            JsonRejection::MissingJsonContentType(_) => {
                "Missing 'Content-Type: application/json' header".to_string()
            }
            _ => "Invalid request body".to_string(),
        };

        ErrorType::BadRequest.with_message(message)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ErrorType::BadRequest.with_message(format!("Invalid query parameters: {}", rejection.body_text()))
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(error: sea_orm::DbErr) -> Self {
        if is_unique_violation(&error) {
            tracing::debug!(?error, "Unique constraint violation detected");
            return ErrorType::Conflict.with_message("Resource already exists");
        }

        match error {
            sea_orm::DbErr::RecordNotFound(record) => {
                ErrorType::NotFound.with_message(format!("Record not found: {}", record))
            }
            sea_orm::DbErr::Conn(connection_err) => {
                tracing::error!("Database connection error: {:?}", connection_err);
                ErrorType::ServiceUnavailable.with_message("Database service unavailable")
            }
            other => {
                tracing::error!("Database error: {:?}", other);
                ErrorType::InternalServerError.with_message("Database error occurred")
            }
        }
    }
}

/// Create a not found error (404)
pub fn not_found(message: impl Into<String>) -> ApiError {
    ErrorType::NotFound.with_message(message)
}

/// Create a conflict error (409)
pub fn conflict(message: impl Into<String>) -> ApiError {
    ErrorType::Conflict.with_message(message)
}

/// Create a bad request error (400)
pub fn bad_request(message: impl Into<String>) -> ApiError {
    ErrorType::BadRequest.with_message(message)
}

/// Create a validation error with field details
pub fn validation_error(message: &str, field_errors: serde_json::Value) -> ApiError {
    ErrorType::BadRequest
        .with_message(message)
        .with_details(field_errors)
}

/// Failure kinds produced by the repositories.
///
/// Callers match on the variant instead of inspecting messages; the HTTP layer maps each
/// variant to its status code through `From<RepositoryError> for ApiError`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A referenced resource does not exist
    #[error("{0}")]
    NotFound(String),
    /// A uniqueness rule would be violated
    #[error("{0}")]
    Conflict(String),
    /// The request references resources inconsistently or carries invalid values
    #[error("{0}")]
    Validation(String),
    /// The database failed
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl RepositoryError {
    /// `"<what> not found"`
    pub fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{what} not found"))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn database_error(error: sea_orm::DbErr) -> Self {
        Self::Database(error)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(message) => not_found(message),
            RepositoryError::Conflict(message) => conflict(message),
            RepositoryError::Validation(message) => bad_request(message),
            RepositoryError::Database(db_err) => db_err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_api_error_basic() {
        let error = ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "Test error message",
        );

        assert_eq!(error.code, Box::from("VALIDATION_FAILED"));
        assert_eq!(error.message, Box::from("Test error message"));
        assert_eq!(error.details, None);
    }

    #[test]
    fn test_api_error_with_details() {
        let error = bad_request("slug is invalid").with_details(json!({"field": "slug"}));

        assert_eq!(error.details, Some(Box::new(json!({"field": "slug"}))));
    }

    #[test]
    fn test_error_type_mapping() {
        let not_found_error: ApiError = ErrorType::NotFound.into();
        assert_eq!(not_found_error.code, Box::from("NOT_FOUND"));
        assert_eq!(not_found_error.message, Box::from("Not Found"));

        let unimplemented: ApiError = ErrorType::NotImplemented.into();
        assert_eq!(unimplemented.status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(unimplemented.code, Box::from("NOT_IMPLEMENTED"));
    }

    #[test]
    fn test_from_anyhow_hides_internal_message() {
        let api_error: ApiError = anyhow::anyhow!("password=hunter2 leaked").into();

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, Box::from("An internal error occurred"));
    }

    #[test]
    fn test_repository_error_mapping() {
        let cases = [
            (RepositoryError::not_found("Row"), StatusCode::NOT_FOUND, "Row not found"),
            (
                RepositoryError::conflict("Tab slug already exists"),
                StatusCode::CONFLICT,
                "Tab slug already exists",
            ),
            (
                RepositoryError::validation_error("Invalid link column"),
                StatusCode::BAD_REQUEST,
                "Invalid link column",
            ),
        ];

        for (error, status, message) in cases {
            let api_error: ApiError = error.into();
            assert_eq!(api_error.status, status);
            assert_eq!(&*api_error.message, message);
        }
    }

    #[test]
    fn test_database_errors_do_not_leak_details() {
        let error = RepositoryError::database_error(sea_orm::DbErr::Custom(
            "relation \"secret_table\" does not exist".to_string(),
        ));
        let api_error: ApiError = error.into();

        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api_error.message.contains("secret_table"));
    }

    #[test]
    fn test_record_not_found_maps_to_404() {
        let api_error: ApiError =
            sea_orm::DbErr::RecordNotFound("table_rows".to_string()).into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_content_type_header() {
        let response = conflict("Resource already exists").into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/problem+json"
        );
    }

    #[test]
    fn test_trace_id_generation() {
        let error = not_found("Workspace not found");

        let trace_id = error.trace_id.expect("trace id is always present");
        assert!(trace_id.starts_with("corr-"));
        assert_eq!(trace_id.len(), 13);
    }
}
