mod test_utils;

use axum::http::{Method, StatusCode};
use serde_json::json;
use test_utils::{seed_workspace, send, setup_test_app};

#[tokio::test]
async fn table_scan_matches_rows_and_logs_every_attempt() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();

    let (_, table) = send(
        &app,
        Method::POST,
        "/data-tables",
        Some(json!({
            "workspace_id": workspace_id,
            "name": "Badges",
            "columns": [
                {"name": "badge", "label": "Badge", "column_type": "text", "is_primary": true},
                {"name": "name", "label": "Name", "column_type": "text"},
            ],
        })),
    )
    .await;
    let table_id = table["id"].as_str().unwrap().to_string();
    send(
        &app,
        Method::POST,
        &format!("/data-tables/{table_id}/rows/bulk"),
        Some(json!({"rows": [
            {"badge": "B-100", "name": "Ada"},
            {"badge": "B-200", "name": "Grace"},
        ]})),
    )
    .await;

    let (status, hit) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{table_id}/scan"),
        Some(json!({"barcode": " b-200 ", "device_id": "scanner-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hit["scan"]["found"], true);
    assert_eq!(hit["scan"]["column_name"], "badge");
    assert_eq!(hit["rows"].as_array().unwrap().len(), 1);
    assert_eq!(hit["rows"][0]["data"]["name"], "Grace");
    assert_eq!(hit["scan"]["matched_row_ids"], json!([hit["rows"][0]["id"]]));

    let (status, miss) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{table_id}/scan"),
        Some(json!({"barcode": "B-999", "column_name": "badge"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(miss["scan"]["found"], false);
    assert!(miss["rows"].as_array().unwrap().is_empty());

    let (status, history) = send(&app, Method::GET, &format!("/scan-history?table_id={table_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 2);

    let scan_id = hit["scan"]["id"].as_str().unwrap();
    let (status, record) = send(&app, Method::GET, &format!("/scan-history/{scan_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["device_id"], "scanner-1");
}

#[tokio::test]
async fn blank_barcode_is_rejected() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (table, _) = test_utils::seed_table(&state.db, workspace_id, "Badges", &[("badge", "text")])
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{}/scan", table.id),
        Some(json!({"barcode": "   ", "column_name": "badge"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}
