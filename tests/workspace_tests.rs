//! Organizations, workspaces and the cascades below them.

mod test_utils;

use axum::http::{Method, StatusCode};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use test_utils::{payload, seed_table, seed_workspace, send, setup_test_app, setup_test_db};
use workspace_hub::{
    models::{data_table, form, request_hub, request_hub_tab, table_column, table_row},
    repositories::{FormRepository, RequestHubRepository, TableRowRepository, WorkspaceRepository},
};

#[tokio::test]
async fn deleting_a_workspace_removes_everything_in_it() {
    let db = setup_test_db().await.unwrap();
    let doomed = seed_workspace(&db).await.unwrap();
    let kept = seed_workspace(&db).await.unwrap();

    for workspace_id in [doomed, kept] {
        let (table, _) = seed_table(&db, workspace_id, "Guests", &[("name", "text")]).await.unwrap();
        TableRowRepository::new(&db)
            .create(table.id, payload(json!({"data": {"name": "Ada"}})))
            .await
            .unwrap();
        FormRepository::new(&db)
            .create(payload(json!({"workspace_id": workspace_id, "name": "Signup"})))
            .await
            .unwrap();
        RequestHubRepository::new(&db)
            .create(workspace_id, payload(json!({"name": "Requests", "tabs": [{"name": "Open"}]})))
            .await
            .unwrap();
    }

    WorkspaceRepository::new(&db).delete(doomed).await.unwrap();

    assert_eq!(data_table::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(table_column::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(table_row::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(form::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(request_hub::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(request_hub_tab::Entity::find().count(&db).await.unwrap(), 1);

    let remaining = data_table::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(remaining.workspace_id, kept);
}

#[tokio::test]
async fn organization_slugs_are_unique() {
    let (app, _state) = setup_test_app().await.unwrap();

    let (status, organization) = send(&app, Method::POST, "/organizations", Some(json!({"name": "Acme Corp"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(organization["slug"], "acme-corp");

    let (status, body) = send(&app, Method::POST, "/organizations", Some(json!({"name": "ACME corp!"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn workspace_crud_over_http() {
    let (app, _state) = setup_test_app().await.unwrap();
    let (_, organization) = send(&app, Method::POST, "/organizations", Some(json!({"name": "Initech"}))).await;

    let (status, workspace) = send(
        &app,
        Method::POST,
        "/workspaces",
        Some(json!({"organization_id": organization["id"], "name": "Marketing Team"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(workspace["slug"], "marketing-team");
    let uri = format!("/workspaces/{}", workspace["id"].as_str().unwrap());

    let (status, updated) = send(&app, Method::PATCH, &uri, Some(json!({"is_archived": true}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_archived"], true);
    assert_eq!(updated["name"], "Marketing Team");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let (app, _state) = setup_test_app().await.unwrap();

    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/health/db", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, document) = send(&app, Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(document["paths"]["/data-tables/{table_id}/rows"].is_object());
}
