//! Form lifecycle and submission write-back.

mod test_utils;

use axum::http::{Method, StatusCode};
use sea_orm::EntityTrait;
use serde_json::json;
use test_utils::{payload, seed_table, seed_workspace, send, setup_test_app, setup_test_db};
use uuid::Uuid;
use workspace_hub::{
    error::RepositoryError,
    models::table_row,
    repositories::{DataTableRepository, FormRepository},
};

#[tokio::test]
async fn submission_writes_one_mapped_row_per_connection() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (table, _) = seed_table(&state.db, workspace_id, "Leads", &[("full_name", "text"), ("email", "email")])
        .await
        .unwrap();

    let (status, form) = send(
        &app,
        Method::POST,
        "/forms",
        Some(json!({
            "workspace_id": workspace_id,
            "name": "Contact Us",
            "status": "published",
            "fields": [
                {"name": "name", "label": "Name", "field_type": "text"},
                {"name": "email", "label": "Email", "field_type": "email"},
                {"name": "message", "label": "Message", "field_type": "textarea"},
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let form_id = form["id"].as_str().unwrap().to_string();
    assert_eq!(form["fields"].as_array().unwrap().len(), 3);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/forms/{form_id}/connections"),
        Some(json!({
            "table_id": table.id,
            "field_mappings": {"name": "full_name", "email": "email"},
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, submission) = send(
        &app,
        Method::POST,
        &format!("/forms/{form_id}/submissions"),
        Some(json!({"data": {"name": "Ada", "email": "ada@example.com", "message": "Hi"}})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(submission["status"], "submitted");
    let created = submission["created_row_ids"].as_array().unwrap();
    assert_eq!(created.len(), 1);

    let rows = table_row::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(created[0], row.id.to_string());
    assert_eq!(row.table_id, table.id);
    assert_eq!(row.data, json!({"full_name": "Ada", "email": "ada@example.com"}));
    assert_eq!(row.metadata["form_submission_id"], submission["id"]);

    let (table, _) = DataTableRepository::new(&state.db).get(table.id).await.unwrap();
    assert_eq!(table.row_count, 1);
}

#[tokio::test]
async fn unpublished_form_rejects_submissions() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();

    let (_, form) = send(
        &app,
        Method::POST,
        "/forms",
        Some(json!({"workspace_id": workspace_id, "name": "Survey"})),
    )
    .await;
    assert_eq!(form["status"], "draft");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/forms/{}/submissions", form["id"].as_str().unwrap()),
        Some(json!({"data": {"answer": 42}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn publishing_stamps_time_and_bumps_version() {
    let db = setup_test_db().await.unwrap();
    let workspace_id = seed_workspace(&db).await.unwrap();
    let forms = FormRepository::new(&db);

    let (form, _) = forms
        .create(payload(json!({"workspace_id": workspace_id, "name": "Event Signup"})))
        .await
        .unwrap();
    assert_eq!(form.version, 1);
    assert!(form.published_at.is_none());
    assert_eq!(form.slug, "event-signup");

    let published = forms
        .update(form.id, payload(json!({"status": "published"})))
        .await
        .unwrap();
    assert_eq!(published.version, 2);
    assert!(published.published_at.is_some());

    // Saving an already published form keeps its version.
    let renamed = forms
        .update(form.id, payload(json!({"status": "published", "name": "RSVP"})))
        .await
        .unwrap();
    assert_eq!(renamed.version, 2);
    assert_eq!(renamed.published_at, published.published_at);
    assert_eq!(renamed.slug, "rsvp");
}

#[tokio::test]
async fn connection_mappings_must_name_existing_columns() {
    let db = setup_test_db().await.unwrap();
    let workspace_id = seed_workspace(&db).await.unwrap();
    let (table, _) = seed_table(&db, workspace_id, "Leads", &[("email", "email")]).await.unwrap();
    let forms = FormRepository::new(&db);
    let (form, _) = forms
        .create(payload(json!({"workspace_id": workspace_id, "name": "Leads form"})))
        .await
        .unwrap();

    let error = forms
        .create_connection(
            form.id,
            payload(json!({"table_id": table.id, "field_mappings": {"email": "phone"}})),
        )
        .await
        .unwrap_err();
    assert!(error.to_string().contains("phone"));

    let error = forms
        .create_connection(
            form.id,
            payload(json!({"table_id": Uuid::new_v4(), "field_mappings": {}})),
        )
        .await
        .unwrap_err();
    assert!(matches!(error, RepositoryError::NotFound(_)));
}
