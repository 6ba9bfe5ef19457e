//! HTTP tests for data tables, columns, rows and views.

mod test_utils;

use axum::http::{Method, StatusCode};
use serde_json::json;
use test_utils::{seed_workspace, send, setup_test_app};
use uuid::Uuid;

#[tokio::test]
async fn create_table_keeps_column_order() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();

    let (status, table) = send(
        &app,
        Method::POST,
        "/data-tables",
        Some(json!({
            "workspace_id": workspace_id,
            "name": "Guest List",
            "columns": [
                {"name": "name", "label": "Name", "column_type": "text", "is_primary": true},
                {"name": "email", "label": "Email", "column_type": "email"},
                {"name": "plus_ones", "label": "Plus ones", "column_type": "number"},
            ],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(table["slug"], "guest-list");
    assert_eq!(table["row_count"], 0);
    let columns = table["columns"].as_array().unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["name", "email", "plus_ones"]);
    for (index, column) in columns.iter().enumerate() {
        assert_eq!(column["position"], index);
    }

    let (status, fetched) = send(&app, Method::GET, &format!("/data-tables/{}", table["id"].as_str().unwrap()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["columns"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn row_data_is_stored_as_sent() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();

    let (_, table) = send(
        &app,
        Method::POST,
        "/data-tables",
        Some(json!({
            "workspace_id": workspace_id,
            "name": "People",
            "columns": [
                {"name": "name", "label": "Name", "column_type": "text"},
                {"name": "age", "label": "Age", "column_type": "number"},
            ],
        })),
    )
    .await;
    let table_id = table["id"].as_str().unwrap();

    let data = json!({"name": "Alice", "age": 30});
    let (status, row) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{table_id}/rows"),
        Some(json!({"data": data})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/data-tables/{table_id}/rows/{}", row["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], data);
    assert_eq!(fetched["is_archived"], false);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (table, _) = test_utils::seed_table(&state.db, workspace_id, "Inventory", &[("sku", "text")])
        .await
        .unwrap();

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/data-tables/{}", table.id),
        Some(json!({"description": "Warehouse stock"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "Warehouse stock");
    assert_eq!(updated["name"], "Inventory");
    assert_eq!(updated["slug"], "inventory");

    // PUT is served by the same partial update.
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/data-tables/{}", table.id),
        Some(json!({"name": "Stock"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Stock");
    assert_eq!(updated["slug"], "stock");
    assert_eq!(updated["description"], "Warehouse stock");
}

#[tokio::test]
async fn row_count_follows_bulk_insert_and_delete() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (table, _) = test_utils::seed_table(&state.db, workspace_id, "Guests", &[("name", "text")])
        .await
        .unwrap();

    let (status, rows) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{}/rows/bulk", table.id),
        Some(json!({"rows": [{"name": "A"}, {"name": "B"}, {"name": "C"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let rows = rows.as_array().unwrap().clone();
    assert_eq!(rows.len(), 3);

    let (_, fetched) = send(&app, Method::GET, &format!("/data-tables/{}", table.id), None).await;
    assert_eq!(fetched["row_count"], 3);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/data-tables/{}/rows/{}", table.id, rows[0]["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Row deleted successfully");

    let (_, fetched) = send(&app, Method::GET, &format!("/data-tables/{}", table.id), None).await;
    assert_eq!(fetched["row_count"], 2);

    let (_, listed) = send(&app, Method::GET, &format!("/data-tables/{}/rows", table.id), None).await;
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["data"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["B", "C"]);
}

#[tokio::test]
async fn out_of_range_pagination_is_rejected() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (table, _) = test_utils::seed_table(&state.db, workspace_id, "Guests", &[("name", "text")])
        .await
        .unwrap();

    for query in ["limit=0", "limit=1001", "offset=-1"] {
        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/data-tables/{}/rows?{query}", table.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert_eq!(body["code"], "VALIDATION_FAILED");
    }

    let (status, body) = send(&app, Method::GET, "/data-tables?limit=501", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn missing_table_returns_not_found() {
    let (app, _state) = setup_test_app().await.unwrap();
    let missing = Uuid::new_v4();

    let (status, body) = send(&app, Method::GET, &format!("/data-tables/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["trace_id"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{missing}/rows"),
        Some(json!({"data": {"name": "Nobody"}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/data-tables",
        Some(json!({"workspace_id": workspace_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn views_and_columns_round_trip() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (table, _) = test_utils::seed_table(&state.db, workspace_id, "Tasks", &[("title", "text")])
        .await
        .unwrap();

    let (status, column) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{}/columns", table.id),
        Some(json!({"name": "status", "label": "Status", "column_type": "select"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(column["position"], 1);

    let (status, view) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{}/views", table.id),
        Some(json!({"name": "Board", "view_type": "kanban"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["view_type"], "kanban");

    let (status, view) = send(
        &app,
        Method::PUT,
        &format!("/data-tables/{}/views/{}", table.id, view["id"].as_str().unwrap()),
        Some(json!({"is_shared": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["is_shared"], true);
    assert_eq!(view["name"], "Board");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/data-tables/{}/columns/{}", table.id, column["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("deleted successfully"));
}

#[tokio::test]
async fn rows_without_position_are_listed_last() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (table, _) = test_utils::seed_table(&state.db, workspace_id, "Queue", &[("name", "text")])
        .await
        .unwrap();
    let rows_uri = format!("/data-tables/{}/rows", table.id);

    let (status, _) = send(&app, Method::POST, &rows_uri, Some(json!({"data": {"name": "Walk-in"}}))).await;
    assert_eq!(status, StatusCode::CREATED);
    send(
        &app,
        Method::POST,
        &format!("{rows_uri}/bulk"),
        Some(json!({"rows": [{"name": "First"}, {"name": "Second"}]})),
    )
    .await;
    send(&app, Method::POST, &rows_uri, Some(json!({"data": {"name": "Pinned"}, "position": 0.5}))).await;

    let (status, listed) = send(&app, Method::GET, &rows_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["data"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["First", "Pinned", "Second", "Walk-in"]);
}
