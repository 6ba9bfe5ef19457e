//! # Form Repository
//!
//! Forms, their fields, submissions and the connections that write submissions into data
//! tables.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use super::data_table::{adjust_row_count, find_table};
use super::{now, updated_slug};
use crate::error::RepositoryError;
use crate::models::form::{self, Entity as Form, FORM_STATUSES};
use crate::models::form_field::{self, Entity as FormField, FIELD_WIDTHS};
use crate::models::form_submission::{self, Entity as FormSubmission, SUBMISSION_STATUSES};
use crate::models::form_table_connection::{self, CONNECTION_TYPES, Entity as FormTableConnection};
use crate::models::table_column::{self, Entity as TableColumn};
use crate::models::{Workspace, table_row};
use crate::schemas::Page;
use crate::schemas::common::{require_choice, require_object, require_text};
use crate::schemas::form::{
    FormConnectionCreate, FormCreate, FormFieldCreate, FormFieldUpdate, FormUpdate,
    SubmissionCreate, SubmissionReview,
};
use crate::slug::resolve_slug;

const PUBLISHED: &str = "published";

/// Filters for listing forms
#[derive(Debug, Clone, Default)]
pub struct FormFilter {
    pub workspace_id: Option<Uuid>,
    pub status: Option<String>,
}

/// A submission together with the ids of the rows its write-back created
pub type SubmissionWithRows = (form_submission::Model, Vec<Uuid>);

/// Repository for Form, FormField, FormSubmission and FormTableConnection operations
pub struct FormRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FormRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: FormFilter, page: Page) -> Result<Vec<form::Model>, RepositoryError> {
        let mut query = Form::find();
        if let Some(workspace_id) = filter.workspace_id {
            query = query.filter(form::Column::WorkspaceId.eq(workspace_id));
        }
        if let Some(status) = filter.status {
            require_choice(&status, FORM_STATUSES, "status")?;
            query = query.filter(form::Column::Status.eq(status));
        }

        let forms = query
            .order_by_desc(form::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(self.db)
            .await?;
        Ok(forms)
    }

    pub async fn find(&self, form_id: Uuid) -> Result<form::Model, RepositoryError> {
        Form::find_by_id(form_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Form"))
    }

    /// Gets a form with its fields ordered by position
    pub async fn get(&self, form_id: Uuid) -> Result<(form::Model, Vec<form_field::Model>), RepositoryError> {
        let form = self.find(form_id).await?;
        let fields = self.list_fields(form_id).await?;
        Ok((form, fields))
    }

    /// Creates a form and its inline fields in one transaction
    pub async fn create(
        &self,
        request: FormCreate,
    ) -> Result<(form::Model, Vec<form_field::Model>), RepositoryError> {
        Workspace::find_by_id(request.workspace_id)
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Workspace"))?;

        let name = require_text(&request.name, "Form name")?;
        let slug = resolve_slug(&name, request.slug.as_deref())?;
        let status = request.status.unwrap_or_else(|| "draft".to_string());
        require_choice(&status, FORM_STATUSES, "status")?;

        let timestamp = now();
        let published_at = (status == PUBLISHED).then_some(timestamp);

        let txn = self.db.begin().await?;
        let form = form::ActiveModel {
            id: Set(Uuid::new_v4()),
            workspace_id: Set(request.workspace_id),
            name: Set(name),
            slug: Set(slug),
            description: Set(request.description),
            settings: Set(request.settings),
            submit_settings: Set(request.submit_settings),
            status: Set(status),
            version: Set(1),
            is_public: Set(request.is_public),
            created_by: Set(request.created_by),
            published_at: Set(published_at),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        let mut fields = Vec::with_capacity(request.fields.len());
        for (index, field) in request.fields.into_iter().enumerate() {
            let position = i32::try_from(index).unwrap_or(i32::MAX);
            fields.push(insert_field(&txn, form.id, field, position).await?);
        }
        txn.commit().await?;

        Ok((form, fields))
    }

    /// Partial update; moving into `published` stamps `published_at` and bumps the version
    pub async fn update(&self, form_id: Uuid, update: FormUpdate) -> Result<form::Model, RepositoryError> {
        let existing = self.find(form_id).await?;
        let slug = updated_slug(&existing.name, update.name.as_deref(), update.slug.as_deref())?;
        let was_published = existing.status == PUBLISHED;
        let version = existing.version;

        let mut active = existing.into_active_model();
        if let Some(name) = update.name {
            active.name = Set(require_text(&name, "Form name")?);
        }
        if let Some(slug) = slug {
            active.slug = Set(slug);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(settings) = update.settings {
            active.settings = Set(settings);
        }
        if let Some(submit_settings) = update.submit_settings {
            active.submit_settings = Set(submit_settings);
        }
        if let Some(is_public) = update.is_public {
            active.is_public = Set(is_public);
        }
        let timestamp = now();
        if let Some(status) = update.status {
            require_choice(&status, FORM_STATUSES, "status")?;
            if status == PUBLISHED && !was_published {
                active.published_at = Set(Some(timestamp));
                active.version = Set(version + 1);
            }
            active.status = Set(status);
        }
        active.updated_at = Set(timestamp);

        Ok(active.update(self.db).await?)
    }

    pub async fn delete(&self, form_id: Uuid) -> Result<(), RepositoryError> {
        let form = self.find(form_id).await?;
        form.delete(self.db).await?;
        Ok(())
    }

    pub async fn list_fields(&self, form_id: Uuid) -> Result<Vec<form_field::Model>, RepositoryError> {
        let fields = FormField::find()
            .filter(form_field::Column::FormId.eq(form_id))
            .order_by_asc(form_field::Column::Position)
            .all(self.db)
            .await?;
        Ok(fields)
    }

    /// Adds a field; without a position it goes to the end
    pub async fn create_field(
        &self,
        form_id: Uuid,
        request: FormFieldCreate,
    ) -> Result<form_field::Model, RepositoryError> {
        self.find(form_id).await?;
        let position = match request.position {
            Some(position) => position,
            None => {
                let count = FormField::find()
                    .filter(form_field::Column::FormId.eq(form_id))
                    .count(self.db)
                    .await?;
                i32::try_from(count).unwrap_or(i32::MAX)
            }
        };
        insert_field(self.db, form_id, request, position).await
    }

    async fn get_field(&self, form_id: Uuid, field_id: Uuid) -> Result<form_field::Model, RepositoryError> {
        FormField::find_by_id(field_id)
            .filter(form_field::Column::FormId.eq(form_id))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Field"))
    }

    pub async fn update_field(
        &self,
        form_id: Uuid,
        field_id: Uuid,
        update: FormFieldUpdate,
    ) -> Result<form_field::Model, RepositoryError> {
        let existing = self.get_field(form_id, field_id).await?;

        let mut active = existing.into_active_model();
        if let Some(name) = update.name {
            active.name = Set(require_text(&name, "Field name")?);
        }
        if let Some(label) = update.label {
            active.label = Set(label);
        }
        if let Some(placeholder) = update.placeholder {
            active.placeholder = Set(Some(placeholder));
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(field_type) = update.field_type {
            active.field_type = Set(require_text(&field_type, "Field type")?);
        }
        if let Some(settings) = update.settings {
            active.settings = Set(settings);
        }
        if let Some(validation) = update.validation {
            active.validation = Set(validation);
        }
        if let Some(options) = update.options {
            active.options = Set(options);
        }
        if let Some(position) = update.position {
            active.position = Set(position);
        }
        if let Some(width) = update.width {
            require_choice(&width, FIELD_WIDTHS, "width")?;
            active.width = Set(width);
        }
        if let Some(is_visible) = update.is_visible {
            active.is_visible = Set(is_visible);
        }
        active.updated_at = Set(now());

        Ok(active.update(self.db).await?)
    }

    pub async fn delete_field(&self, form_id: Uuid, field_id: Uuid) -> Result<(), RepositoryError> {
        let field = self.get_field(form_id, field_id).await?;
        field.delete(self.db).await?;
        Ok(())
    }

    /// Lists submissions, newest first
    pub async fn list_submissions(
        &self,
        form_id: Uuid,
        status: Option<String>,
        page: Page,
    ) -> Result<Vec<form_submission::Model>, RepositoryError> {
        self.find(form_id).await?;

        let mut query = FormSubmission::find().filter(form_submission::Column::FormId.eq(form_id));
        if let Some(status) = status {
            require_choice(&status, SUBMISSION_STATUSES, "status")?;
            query = query.filter(form_submission::Column::Status.eq(status));
        }

        let submissions = query
            .order_by_desc(form_submission::Column::SubmittedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(self.db)
            .await?;
        Ok(submissions)
    }

    /// Stores a submission and writes it into every `write` connection's table, atomically
    pub async fn create_submission(
        &self,
        form_id: Uuid,
        request: SubmissionCreate,
    ) -> Result<SubmissionWithRows, RepositoryError> {
        let form = self.find(form_id).await?;
        if form.status != PUBLISHED {
            return Err(RepositoryError::validation_error(
                "Form is not accepting submissions",
            ));
        }
        require_object(&request.data, "data")?;

        let connections = FormTableConnection::find()
            .filter(form_table_connection::Column::FormId.eq(form_id))
            .filter(form_table_connection::Column::ConnectionType.eq("write"))
            .order_by_asc(form_table_connection::Column::CreatedAt)
            .all(self.db)
            .await?;

        let txn = self.db.begin().await?;
        let timestamp = now();
        let submission = form_submission::ActiveModel {
            id: Set(Uuid::new_v4()),
            form_id: Set(form_id),
            data: Set(request.data),
            metadata: Set(request.metadata),
            status: Set("submitted".to_string()),
            submitted_by: Set(request.submitted_by),
            email: Set(request.email),
            submitted_at: Set(timestamp),
            reviewed_at: Set(None),
            reviewed_by: Set(None),
        }
        .insert(&txn)
        .await?;

        let mut row_ids = Vec::with_capacity(connections.len());
        for connection in &connections {
            let row = table_row::ActiveModel {
                id: Set(Uuid::new_v4()),
                table_id: Set(connection.table_id),
                data: Set(map_submission(&submission.data, &connection.field_mappings)),
                metadata: Set(json!({
                    "form_submission_id": submission.id,
                    "form_id": form_id,
                })),
                is_archived: Set(false),
                position: Set(None),
                created_by: Set(request.submitted_by),
                updated_by: Set(None),
                created_at: Set(timestamp),
                updated_at: Set(timestamp),
            }
            .insert(&txn)
            .await?;
            adjust_row_count(&txn, connection.table_id, 1).await?;
            row_ids.push(row.id);
        }
        txn.commit().await?;

        metrics::counter!("form_submissions_total").increment(1);
        if !row_ids.is_empty() {
            tracing::info!(
                %form_id,
                submission_id = %submission.id,
                rows = row_ids.len(),
                "Submission written to tables"
            );
        }

        Ok((submission, row_ids))
    }

    pub async fn get_submission(
        &self,
        form_id: Uuid,
        submission_id: Uuid,
    ) -> Result<form_submission::Model, RepositoryError> {
        FormSubmission::find_by_id(submission_id)
            .filter(form_submission::Column::FormId.eq(form_id))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Submission"))
    }

    pub async fn review_submission(
        &self,
        form_id: Uuid,
        submission_id: Uuid,
        review: SubmissionReview,
    ) -> Result<form_submission::Model, RepositoryError> {
        require_choice(&review.status, SUBMISSION_STATUSES, "status")?;
        let existing = self.get_submission(form_id, submission_id).await?;

        let mut active = existing.into_active_model();
        active.status = Set(review.status);
        active.reviewed_by = Set(review.reviewed_by);
        active.reviewed_at = Set(Some(now()));

        Ok(active.update(self.db).await?)
    }

    pub async fn list_connections(
        &self,
        form_id: Uuid,
    ) -> Result<Vec<form_table_connection::Model>, RepositoryError> {
        self.find(form_id).await?;

        let connections = FormTableConnection::find()
            .filter(form_table_connection::Column::FormId.eq(form_id))
            .order_by_asc(form_table_connection::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(connections)
    }

    /// Connects a form to a table of the same workspace; mapped columns must exist
    pub async fn create_connection(
        &self,
        form_id: Uuid,
        request: FormConnectionCreate,
    ) -> Result<form_table_connection::Model, RepositoryError> {
        let form = self.find(form_id).await?;
        let table = find_table(self.db, request.table_id).await?;
        if table.workspace_id != form.workspace_id {
            return Err(RepositoryError::validation_error(
                "Table must be in the same workspace as the form",
            ));
        }

        let connection_type = request.connection_type.unwrap_or_else(|| "write".to_string());
        require_choice(&connection_type, CONNECTION_TYPES, "connection_type")?;
        ensure_mapped_columns(self.db, table.id, &request.field_mappings).await?;

        let timestamp = now();
        let connection = form_table_connection::ActiveModel {
            id: Set(Uuid::new_v4()),
            form_id: Set(form_id),
            table_id: Set(table.id),
            connection_type: Set(connection_type),
            field_mappings: Set(request.field_mappings),
            filters: Set(request.filters),
            settings: Set(request.settings),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };
        Ok(connection.insert(self.db).await?)
    }

    pub async fn delete_connection(&self, form_id: Uuid, connection_id: Uuid) -> Result<(), RepositoryError> {
        let connection = FormTableConnection::find_by_id(connection_id)
            .filter(form_table_connection::Column::FormId.eq(form_id))
            .one(self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Connection"))?;
        connection.delete(self.db).await?;
        Ok(())
    }
}

async fn insert_field<C: ConnectionTrait>(
    conn: &C,
    form_id: Uuid,
    request: FormFieldCreate,
    position: i32,
) -> Result<form_field::Model, RepositoryError> {
    let name = require_text(&request.name, "Field name")?;
    let field_type = require_text(&request.field_type, "Field type")?;
    let width = request.width.unwrap_or_else(|| "full".to_string());
    require_choice(&width, FIELD_WIDTHS, "width")?;

    let timestamp = now();
    let field = form_field::ActiveModel {
        id: Set(Uuid::new_v4()),
        form_id: Set(form_id),
        name: Set(name),
        label: Set(request.label),
        placeholder: Set(request.placeholder),
        description: Set(request.description),
        field_type: Set(field_type),
        settings: Set(request.settings),
        validation: Set(request.validation),
        options: Set(request.options),
        position: Set(position),
        width: Set(width),
        is_visible: Set(request.is_visible),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
    };
    Ok(field.insert(conn).await?)
}

/// `field_mappings` must be an object of form field name to the name of an existing column
async fn ensure_mapped_columns<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
    field_mappings: &Value,
) -> Result<(), RepositoryError> {
    let Some(mappings) = field_mappings.as_object() else {
        return Err(RepositoryError::validation_error(
            "field_mappings must be a JSON object",
        ));
    };

    let columns: Vec<String> = TableColumn::find()
        .filter(table_column::Column::TableId.eq(table_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|column| column.name)
        .collect();

    for (field, column) in mappings {
        let Some(column) = column.as_str() else {
            return Err(RepositoryError::validation_error(format!(
                "Mapping for field '{field}' must be a column name"
            )));
        };
        if !columns.iter().any(|name| name == column) {
            return Err(RepositoryError::validation_error(format!(
                "Column '{column}' does not exist on the table"
            )));
        }
    }
    Ok(())
}

/// Builds row data from submitted values: `row[column] = submission[field]` for every
/// mapping whose field was submitted
fn map_submission(data: &Value, field_mappings: &Value) -> Value {
    let mut row = Map::new();
    if let (Some(values), Some(mappings)) = (data.as_object(), field_mappings.as_object()) {
        for (field, column) in mappings {
            if let (Some(value), Some(column)) = (values.get(field), column.as_str()) {
                row.insert(column.to_string(), value.clone());
            }
        }
    }
    Value::Object(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_maps_only_present_fields() {
        let data = json!({"full_name": "Ada", "email": "ada@example.com", "extra": 1});
        let mappings = json!({"full_name": "name", "email": "email", "phone": "phone"});
        assert_eq!(
            map_submission(&data, &mappings),
            json!({"name": "Ada", "email": "ada@example.com"})
        );
    }
}
