//! Request hubs and their tabs, scoped to a workspace.

mod test_utils;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use test_utils::{seed_workspace, send, setup_test_app};
use uuid::Uuid;

async fn create_hub(app: &axum::Router, workspace_id: Uuid, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        &format!("/workspaces/{workspace_id}/request-hubs"),
        Some(body),
    )
    .await
}

#[tokio::test]
async fn hub_is_created_with_tabs_and_found_by_slug() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();

    let (status, hub) = create_hub(
        &app,
        workspace_id,
        json!({
            "name": "IT Requests",
            "tabs": [{"name": "Open"}, {"name": "Closed", "is_visible": false}],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(hub["slug"], "it-requests");
    let tabs = hub["tabs"].as_array().unwrap();
    assert_eq!(tabs.len(), 2);
    assert_eq!(tabs[0]["slug"], "open");
    assert_eq!(tabs[1]["position"], 1);

    let (status, found) = send(
        &app,
        Method::GET,
        &format!("/workspaces/{workspace_id}/request-hubs/by-slug/it-requests"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], hub["id"]);

    let (status, visible) = send(
        &app,
        Method::GET,
        &format!("/workspaces/{workspace_id}/request-hubs/{}/tabs", hub["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(visible.as_array().unwrap().len(), 1);

    // The same slug in another workspace is a different hub.
    let other_workspace = seed_workspace(&state.db).await.unwrap();
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/workspaces/{other_workspace}/request-hubs/by-slug/it-requests"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_hub_slug_conflicts() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();

    let (status, _) = create_hub(&app, workspace_id, json!({"name": "Facilities"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create_hub(&app, workspace_id, json!({"name": "Other", "slug": "facilities"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn duplicate_tab_slug_conflicts_without_adding_a_tab() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (_, hub) = create_hub(&app, workspace_id, json!({"name": "Support", "tabs": [{"name": "Inbox"}]})).await;
    let tabs_uri = format!("/workspaces/{workspace_id}/request-hubs/{}/tabs", hub["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::POST, &tabs_uri, Some(json!({"name": "Other", "slug": "inbox"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, tabs) = send(&app, Method::GET, &format!("{tabs_uri}?include_hidden=true"), None).await;
    assert_eq!(tabs.as_array().unwrap().len(), 1);

    // Duplicates inside one create request roll the whole hub back.
    let (status, _) = create_hub(
        &app,
        workspace_id,
        json!({"name": "Broken", "tabs": [{"name": "Same"}, {"name": "same"}]}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/workspaces/{workspace_id}/request-hubs/by-slug/broken"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reorder_applies_new_positions() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (_, hub) = create_hub(
        &app,
        workspace_id,
        json!({"name": "Design", "tabs": [{"name": "A"}, {"name": "B"}, {"name": "C"}]}),
    )
    .await;
    let tabs = hub["tabs"].as_array().unwrap();
    let ids: Vec<&str> = tabs.iter().map(|tab| tab["id"].as_str().unwrap()).collect();

    let (status, reordered) = send(
        &app,
        Method::POST,
        &format!("/workspaces/{workspace_id}/request-hubs/{}/tabs/reorder", hub["id"].as_str().unwrap()),
        Some(json!({"tabs": [
            {"id": ids[2], "position": 0},
            {"id": ids[0], "position": 1},
            {"id": ids[1], "position": 2},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = reordered
        .as_array()
        .unwrap()
        .iter()
        .map(|tab| tab["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["C", "A", "B"]);
}

#[tokio::test]
async fn body_workspace_must_match_path() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();

    let (status, body) = create_hub(
        &app,
        workspace_id,
        json!({"name": "Mismatch", "workspace_id": Uuid::new_v4()}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (_, hub) = create_hub(&app, workspace_id, json!({"name": "Scoped"})).await;
    let other_workspace = seed_workspace(&state.db).await.unwrap();
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/workspaces/{other_workspace}/request-hubs/{}", hub["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_hub_returns_no_content() {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (_, hub) = create_hub(&app, workspace_id, json!({"name": "Temp", "tabs": [{"name": "Only"}]})).await;
    let hub_uri = format!("/workspaces/{workspace_id}/request-hubs/{}", hub["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &hub_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &hub_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
