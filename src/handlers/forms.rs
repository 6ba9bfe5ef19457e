//! # Forms API Handlers
//!
//! Forms with their fields, submissions and table connections. Submitting to a form with
//! `write` connections also inserts rows into the connected tables.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::repositories::FormRepository;
use crate::repositories::form::FormFilter;
use crate::schemas::Page;
use crate::schemas::form::{
    FORM_PAGE, FormConnectionCreate, FormConnectionResponse, FormCreate, FormFieldCreate,
    FormFieldResponse, FormFieldUpdate, FormResponse, FormUpdate, ListFormsQuery,
    ListSubmissionsQuery, SUBMISSION_PAGE, SubmissionCreate, SubmissionResponse, SubmissionReview,
};
use crate::server::AppState;

#[utoipa::path(
    get,
    path = "/forms",
    params(ListFormsQuery),
    responses(
        (status = 200, description = "Forms, newest first", body = [FormResponse]),
        (status = 400, description = "Invalid filter or pagination", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn list_forms(
    State(state): State<AppState>,
    query: Result<Query<ListFormsQuery>, QueryRejection>,
) -> Result<Json<Vec<FormResponse>>, ApiError> {
    let Query(query) = query?;
    let page = Page::resolve(query.limit, query.offset, FORM_PAGE)?;
    let filter = FormFilter {
        workspace_id: query.workspace_id,
        status: query.status,
    };

    let forms = FormRepository::new(&state.db).list(filter, page).await?;
    Ok(Json(forms.into_iter().map(Into::into).collect()))
}

/// Create a form, optionally with its fields
#[utoipa::path(
    post,
    path = "/forms",
    request_body = FormCreate,
    responses(
        (status = 201, description = "Form created", body = FormResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Workspace not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn create_form(
    State(state): State<AppState>,
    payload: Result<Json<FormCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<FormResponse>), ApiError> {
    let Json(payload) = payload?;

    let (form, fields) = FormRepository::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(FormResponse::with_fields(form, fields))))
}

#[utoipa::path(
    get,
    path = "/forms/{form_id}",
    params(("form_id" = Uuid, Path, description = "Form ID")),
    responses(
        (status = 200, description = "Form with fields ordered by position", body = FormResponse),
        (status = 404, description = "Form not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn get_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<FormResponse>, ApiError> {
    let (form, fields) = FormRepository::new(&state.db).get(form_id).await?;
    Ok(Json(FormResponse::with_fields(form, fields)))
}

/// Update a form; publishing stamps `published_at` and bumps the version
#[utoipa::path(
    patch,
    path = "/forms/{form_id}",
    params(("form_id" = Uuid, Path, description = "Form ID")),
    request_body = FormUpdate,
    responses(
        (status = 200, description = "Form updated", body = FormResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Form not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn update_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
    payload: Result<Json<FormUpdate>, JsonRejection>,
) -> Result<Json<FormResponse>, ApiError> {
    let Json(payload) = payload?;

    let form = FormRepository::new(&state.db).update(form_id, payload).await?;
    Ok(Json(form.into()))
}

#[utoipa::path(
    delete,
    path = "/forms/{form_id}",
    params(("form_id" = Uuid, Path, description = "Form ID")),
    responses(
        (status = 204, description = "Form deleted"),
        (status = 404, description = "Form not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn delete_form(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    FormRepository::new(&state.db).delete(form_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/forms/{form_id}/fields",
    params(("form_id" = Uuid, Path, description = "Form ID")),
    responses(
        (status = 200, description = "Fields ordered by position", body = [FormFieldResponse]),
        (status = 404, description = "Form not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn list_fields(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<Vec<FormFieldResponse>>, ApiError> {
    let (_, fields) = FormRepository::new(&state.db).get(form_id).await?;
    Ok(Json(fields.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/forms/{form_id}/fields",
    params(("form_id" = Uuid, Path, description = "Form ID")),
    request_body = FormFieldCreate,
    responses(
        (status = 201, description = "Field created", body = FormFieldResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Form not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn create_field(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
    payload: Result<Json<FormFieldCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<FormFieldResponse>), ApiError> {
    let Json(payload) = payload?;

    let field = FormRepository::new(&state.db)
        .create_field(form_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(field.into())))
}

#[utoipa::path(
    patch,
    path = "/forms/{form_id}/fields/{field_id}",
    params(
        ("form_id" = Uuid, Path, description = "Form ID"),
        ("field_id" = Uuid, Path, description = "Field ID")
    ),
    request_body = FormFieldUpdate,
    responses(
        (status = 200, description = "Field updated", body = FormFieldResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 404, description = "Field not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn update_field(
    State(state): State<AppState>,
    Path((form_id, field_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<FormFieldUpdate>, JsonRejection>,
) -> Result<Json<FormFieldResponse>, ApiError> {
    let Json(payload) = payload?;

    let field = FormRepository::new(&state.db)
        .update_field(form_id, field_id, payload)
        .await?;
    Ok(Json(field.into()))
}

#[utoipa::path(
    delete,
    path = "/forms/{form_id}/fields/{field_id}",
    params(
        ("form_id" = Uuid, Path, description = "Form ID"),
        ("field_id" = Uuid, Path, description = "Field ID")
    ),
    responses(
        (status = 204, description = "Field deleted"),
        (status = 404, description = "Field not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn delete_field(
    State(state): State<AppState>,
    Path((form_id, field_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    FormRepository::new(&state.db)
        .delete_field(form_id, field_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/forms/{form_id}/submissions",
    params(("form_id" = Uuid, Path, description = "Form ID"), ListSubmissionsQuery),
    responses(
        (status = 200, description = "Submissions, newest first", body = [SubmissionResponse]),
        (status = 400, description = "Invalid filter or pagination", body = ApiError),
        (status = 404, description = "Form not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn list_submissions(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
    query: Result<Query<ListSubmissionsQuery>, QueryRejection>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let Query(query) = query?;
    let page = Page::resolve(query.limit, query.offset, SUBMISSION_PAGE)?;

    let submissions = FormRepository::new(&state.db)
        .list_submissions(form_id, query.status, page)
        .await?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

/// Submit a response; `write` connections receive a new row in the same transaction
#[utoipa::path(
    post,
    path = "/forms/{form_id}/submissions",
    params(("form_id" = Uuid, Path, description = "Form ID")),
    request_body = SubmissionCreate,
    responses(
        (status = 201, description = "Submission stored", body = SubmissionResponse),
        (status = 400, description = "Form not published or invalid data", body = ApiError),
        (status = 404, description = "Form not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn create_submission(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
    payload: Result<Json<SubmissionCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let Json(payload) = payload?;

    let (submission, row_ids) = FormRepository::new(&state.db)
        .create_submission(form_id, payload)
        .await?;

    let mut response = SubmissionResponse::from(submission);
    response.created_row_ids = row_ids;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/forms/{form_id}/submissions/{submission_id}",
    params(
        ("form_id" = Uuid, Path, description = "Form ID"),
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission", body = SubmissionResponse),
        (status = 404, description = "Submission not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn get_submission(
    State(state): State<AppState>,
    Path((form_id, submission_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = FormRepository::new(&state.db)
        .get_submission(form_id, submission_id)
        .await?;
    Ok(Json(submission.into()))
}

/// Review a submission (sets status, reviewer and review time)
#[utoipa::path(
    patch,
    path = "/forms/{form_id}/submissions/{submission_id}",
    params(
        ("form_id" = Uuid, Path, description = "Form ID"),
        ("submission_id" = Uuid, Path, description = "Submission ID")
    ),
    request_body = SubmissionReview,
    responses(
        (status = 200, description = "Submission reviewed", body = SubmissionResponse),
        (status = 400, description = "Invalid status", body = ApiError),
        (status = 404, description = "Submission not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn review_submission(
    State(state): State<AppState>,
    Path((form_id, submission_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<SubmissionReview>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let Json(payload) = payload?;

    let submission = FormRepository::new(&state.db)
        .review_submission(form_id, submission_id, payload)
        .await?;
    Ok(Json(submission.into()))
}

#[utoipa::path(
    get,
    path = "/forms/{form_id}/connections",
    params(("form_id" = Uuid, Path, description = "Form ID")),
    responses(
        (status = 200, description = "Table connections", body = [FormConnectionResponse]),
        (status = 404, description = "Form not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn list_connections(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
) -> Result<Json<Vec<FormConnectionResponse>>, ApiError> {
    let connections = FormRepository::new(&state.db)
        .list_connections(form_id)
        .await?;
    Ok(Json(connections.into_iter().map(Into::into).collect()))
}

/// Connect a form to a data table of the same workspace
#[utoipa::path(
    post,
    path = "/forms/{form_id}/connections",
    params(("form_id" = Uuid, Path, description = "Form ID")),
    request_body = FormConnectionCreate,
    responses(
        (status = 201, description = "Connection created", body = FormConnectionResponse),
        (status = 400, description = "Table in another workspace or unknown mapped column", body = ApiError),
        (status = 404, description = "Form or table not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn create_connection(
    State(state): State<AppState>,
    Path(form_id): Path<Uuid>,
    payload: Result<Json<FormConnectionCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<FormConnectionResponse>), ApiError> {
    let Json(payload) = payload?;

    let connection = FormRepository::new(&state.db)
        .create_connection(form_id, payload)
        .await
        .map_err(|error| {
            tracing::debug!(%form_id, error = %error, "Form connection rejected");
            ApiError::from(error)
        })?;
    Ok((StatusCode::CREATED, Json(connection.into())))
}

#[utoipa::path(
    delete,
    path = "/forms/{form_id}/connections/{connection_id}",
    params(
        ("form_id" = Uuid, Path, description = "Form ID"),
        ("connection_id" = Uuid, Path, description = "Connection ID")
    ),
    responses(
        (status = 204, description = "Connection deleted"),
        (status = 404, description = "Connection not found", body = ApiError)
    ),
    tag = "forms"
)]
pub async fn delete_connection(
    State(state): State<AppState>,
    Path((form_id, connection_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    FormRepository::new(&state.db)
        .delete_connection(form_id, connection_id)
        .await
        .map_err(|error| ApiError::from(error).with_details(json!({ "connection_id": connection_id })))?;
    Ok(StatusCode::NO_CONTENT)
}
