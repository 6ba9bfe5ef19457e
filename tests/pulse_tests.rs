//! Pulse check-in tracking over HTTP.

mod test_utils;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use test_utils::{seed_table, seed_workspace, send, setup_test_app};
use uuid::Uuid;

struct Event {
    app: axum::Router,
    table_id: Uuid,
    pulse_id: String,
    guests: Vec<String>,
}

/// A table of four guests with Pulse enabled on it
async fn event(settings: Value) -> Event {
    let (app, state) = setup_test_app().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (table, columns) = seed_table(&state.db, workspace_id, "RSVPs", &[("name", "text"), ("ticket", "text")])
        .await
        .unwrap();

    let (_, rows) = send(
        &app,
        Method::POST,
        &format!("/data-tables/{}/rows/bulk", table.id),
        Some(json!({"rows": [
            {"name": "Ada", "ticket": "T-1"},
            {"name": "Grace", "ticket": "T-2"},
            {"name": "Linus", "ticket": "T-3"},
            {"name": "Ken", "ticket": "T-4"},
        ]})),
    )
    .await;
    let guests = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap().to_string())
        .collect();

    let (status, pulse) = send(
        &app,
        Method::POST,
        "/pulse",
        Some(json!({
            "table_id": table.id,
            "check_in_column_id": columns[1].id,
            "settings": settings,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pulse["total_rsvps"], 4);
    assert_eq!(pulse["checked_in_count"], 0);

    Event {
        app,
        table_id: table.id,
        pulse_id: pulse["id"].as_str().unwrap().to_string(),
        guests,
    }
}

impl Event {
    async fn check_in(&self, row: &str, walk_in: bool) -> (StatusCode, Value) {
        send(
            &self.app,
            Method::POST,
            "/pulse/check-ins",
            Some(json!({
                "pulse_table_id": self.pulse_id,
                "row_id": row,
                "is_walk_in": walk_in,
                "scanner_user_name": "Door 1",
            })),
        )
        .await
    }

    async fn config(&self) -> Value {
        let (status, body) = send(&self.app, Method::GET, &format!("/pulse/tables/{}", self.table_id), None).await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}

#[tokio::test]
async fn repeat_scans_fold_into_one_check_in() {
    let event = event(json!({})).await;
    let guest = event.guests[0].clone();

    let (status, first) = event.check_in(&guest, false).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["check_in_count"], 1);
    assert_eq!(first["row_data"]["name"], "Ada");

    let (status, second) = event.check_in(&guest, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["check_in_count"], 2);

    let config = event.config().await;
    assert_eq!(config["checked_in_count"], 1);
    assert!(config["last_check_in_at"].is_string());

    let (_, check_ins) = send(
        &event.app,
        Method::GET,
        &format!("/pulse/tables/{}/check-ins", event.table_id),
        None,
    )
    .await;
    assert_eq!(check_ins.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_scans_create_new_check_ins_when_allowed() {
    let event = event(json!({"allow_duplicate_scans": true})).await;
    let guest = event.guests[0].clone();

    let (first_status, first) = event.check_in(&guest, false).await;
    let (second_status, second) = event.check_in(&guest, false).await;
    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(second_status, StatusCode::CREATED);
    assert_ne!(first["id"], second["id"]);
    assert_eq!(event.config().await["checked_in_count"], 2);
}

#[tokio::test]
async fn counters_and_dashboard_rate() {
    let event = event(json!({})).await;
    event.check_in(&event.guests[0], false).await;
    event.check_in(&event.guests[1], true).await;
    event.check_in(&event.guests[2], false).await;

    let config = event.config().await;
    assert_eq!(config["checked_in_count"], 3);
    assert_eq!(config["walk_in_count"], 1);

    let (status, session) = send(
        &event.app,
        Method::POST,
        "/pulse/sessions",
        Some(json!({"pulse_table_id": event.pulse_id, "scanner_name": "Door 1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["is_active"], true);

    let (status, dashboard) = send(
        &event.app,
        Method::GET,
        &format!("/pulse/tables/{}/dashboard?recent_limit=2", event.table_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_rsvps"], 4);
    assert_eq!(dashboard["checked_in_count"], 3);
    assert_eq!(dashboard["check_in_rate"], 75.0);
    assert_eq!(dashboard["active_scanners"], 1);
    let recent = dashboard["recent_check_ins"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["row_data"]["name"], "Linus");
}

#[tokio::test]
async fn refresh_stats_recomputes_counters() {
    let event = event(json!({})).await;
    event.check_in(&event.guests[0], false).await;

    send(
        &event.app,
        Method::POST,
        &format!("/data-tables/{}/rows", event.table_id),
        Some(json!({"data": {"name": "Late RSVP", "ticket": "T-5"}})),
    )
    .await;
    assert_eq!(event.config().await["total_rsvps"], 4);

    let (status, refreshed) = send(
        &event.app,
        Method::POST,
        &format!("/pulse/tables/{}/refresh-stats", event.table_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["total_rsvps"], 5);
    assert_eq!(refreshed["checked_in_count"], 1);
    assert_eq!(refreshed["walk_in_count"], 0);
}

#[tokio::test]
async fn enabling_twice_conflicts() {
    let event = event(json!({})).await;

    let (status, body) = send(
        &event.app,
        Method::POST,
        "/pulse",
        Some(json!({"table_id": event.table_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn check_in_for_a_foreign_row_is_rejected() {
    let event = event(json!({})).await;

    let (status, body) = event.check_in(&Uuid::new_v4().to_string(), false).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (status, _) = send(
        &event.app,
        Method::DELETE,
        &format!("/pulse/tables/{}", event.table_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = event.check_in(&event.guests[0], false).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
