//! Form, form field, submission and form-table connection DTOs.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{PageLimits, default_true, empty_array, empty_object};
use crate::models::{form, form_field, form_submission, form_table_connection};

pub const FORM_PAGE: PageLimits = PageLimits::new(50, 200);
pub const SUBMISSION_PAGE: PageLimits = PageLimits::new(100, 500);

/// Request payload for creating a form, optionally with its fields
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FormCreate {
    pub workspace_id: Uuid,
    #[schema(example = "Event RSVP")]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default = "empty_object")]
    pub settings: Value,
    #[serde(default = "empty_object")]
    pub submit_settings: Value,
    /// `draft` unless given
    pub status: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub created_by: Option<Uuid>,
    /// Fields are stored in the submitted order
    #[serde(default)]
    pub fields: Vec<FormFieldCreate>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FormUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub settings: Option<Value>,
    pub submit_settings: Option<Value>,
    /// Moving to `published` stamps `published_at` and bumps `version`
    pub status: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormResponse {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub settings: Value,
    pub submit_settings: Value,
    pub status: String,
    pub version: i32,
    pub is_public: bool,
    pub created_by: Option<Uuid>,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    /// Present on single-form responses, ordered by position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FormFieldResponse>>,
}

impl FormResponse {
    pub fn with_fields(model: form::Model, fields: Vec<form_field::Model>) -> Self {
        Self {
            fields: Some(fields.into_iter().map(Into::into).collect()),
            ..model.into()
        }
    }
}

impl From<form::Model> for FormResponse {
    fn from(model: form::Model) -> Self {
        Self {
            id: model.id,
            workspace_id: model.workspace_id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            settings: model.settings,
            submit_settings: model.submit_settings,
            status: model.status,
            version: model.version,
            is_public: model.is_public,
            created_by: model.created_by,
            published_at: model.published_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
            fields: None,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListFormsQuery {
    pub workspace_id: Option<Uuid>,
    /// Filter by status
    pub status: Option<String>,
    /// Page size (default 50, max 200)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FormFieldCreate {
    /// Key of the value in submission data
    #[schema(example = "email")]
    pub name: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    #[schema(example = "email")]
    pub field_type: String,
    #[serde(default = "empty_object")]
    pub settings: Value,
    #[serde(default = "empty_object")]
    pub validation: Value,
    #[serde(default = "empty_array")]
    pub options: Value,
    /// Defaults to the end of the list
    pub position: Option<i32>,
    /// `full` unless given
    pub width: Option<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FormFieldUpdate {
    pub name: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub field_type: Option<String>,
    pub settings: Option<Value>,
    pub validation: Option<Value>,
    pub options: Option<Value>,
    pub position: Option<i32>,
    pub width: Option<String>,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormFieldResponse {
    pub id: Uuid,
    pub form_id: Uuid,
    pub name: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub field_type: String,
    pub settings: Value,
    pub validation: Value,
    pub options: Value,
    pub position: i32,
    pub width: String,
    pub is_visible: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<form_field::Model> for FormFieldResponse {
    fn from(model: form_field::Model) -> Self {
        Self {
            id: model.id,
            form_id: model.form_id,
            name: model.name,
            label: model.label,
            placeholder: model.placeholder,
            description: model.description,
            field_type: model.field_type,
            settings: model.settings,
            validation: model.validation,
            options: model.options,
            position: model.position,
            width: model.width,
            is_visible: model.is_visible,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A response to a published form
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmissionCreate {
    /// Values keyed by form field name
    #[serde(default = "empty_object")]
    pub data: Value,
    #[serde(default = "empty_object")]
    pub metadata: Value,
    pub submitted_by: Option<Uuid>,
    pub email: Option<String>,
}

/// Review decision on a submission
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmissionReview {
    #[schema(example = "approved")]
    pub status: String,
    pub reviewed_by: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub form_id: Uuid,
    pub data: Value,
    pub metadata: Value,
    pub status: String,
    pub submitted_by: Option<Uuid>,
    pub email: Option<String>,
    pub submitted_at: DateTime<FixedOffset>,
    pub reviewed_at: Option<DateTime<FixedOffset>>,
    pub reviewed_by: Option<Uuid>,
    /// Rows written to connected tables by this submission (create only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub created_row_ids: Vec<Uuid>,
}

impl From<form_submission::Model> for SubmissionResponse {
    fn from(model: form_submission::Model) -> Self {
        Self {
            id: model.id,
            form_id: model.form_id,
            data: model.data,
            metadata: model.metadata,
            status: model.status,
            submitted_by: model.submitted_by,
            email: model.email,
            submitted_at: model.submitted_at,
            reviewed_at: model.reviewed_at,
            reviewed_by: model.reviewed_by,
            created_row_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSubmissionsQuery {
    pub status: Option<String>,
    /// Page size (default 100, max 500)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FormConnectionCreate {
    pub table_id: Uuid,
    /// `write` unless given
    pub connection_type: Option<String>,
    /// Form field name to column name
    #[serde(default = "empty_object")]
    pub field_mappings: Value,
    #[serde(default = "empty_object")]
    pub filters: Value,
    #[serde(default = "empty_object")]
    pub settings: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormConnectionResponse {
    pub id: Uuid,
    pub form_id: Uuid,
    pub table_id: Uuid,
    pub connection_type: String,
    pub field_mappings: Value,
    pub filters: Value,
    pub settings: Value,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<form_table_connection::Model> for FormConnectionResponse {
    fn from(model: form_table_connection::Model) -> Self {
        Self {
            id: model.id,
            form_id: model.form_id,
            table_id: model.table_id,
            connection_type: model.connection_type,
            field_mappings: model.field_mappings,
            filters: model.filters,
            settings: model.settings,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
