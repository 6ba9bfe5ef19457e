//! WebSocket relay tests against a real listener.

mod test_utils;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use test_utils::{seed_table, seed_workspace, setup_test_state};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use uuid::Uuid;
use workspace_hub::server::{AppState, create_app};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(200);

/// Serves the app on an ephemeral port and returns the `ws://` base URL.
async fn spawn_server(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_app(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("ws://{addr}")
}

async fn connect(base_url: &str, table_id: Uuid) -> Client {
    let (client, response) = connect_async(format!("{base_url}/ws/tables/{table_id}"))
        .await
        .unwrap();
    assert_eq!(response.status(), 101);
    client
}

/// Registration happens in the upgraded task, after the handshake completes.
async fn wait_for_connections(state: &AppState, table_id: Uuid, expected: usize) {
    let waited = tokio::time::timeout(WAIT, async {
        while state.broadcaster.connection_count(table_id).await != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "table {table_id} never reached {expected} connections");
}

async fn next_text(client: &mut Client) -> String {
    loop {
        let message = tokio::time::timeout(WAIT, client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("websocket error");
        if message.is_text() {
            return message.to_text().unwrap().to_string();
        }
    }
}

async fn assert_silent(client: &mut Client) {
    let received = tokio::time::timeout(QUIET, client.next()).await;
    assert!(received.is_err(), "unexpected frame: {received:?}");
}

#[tokio::test]
async fn frames_reach_other_subscribers_of_the_same_table_only() {
    let state = setup_test_state().await.unwrap();
    let workspace_id = seed_workspace(&state.db).await.unwrap();
    let (table, _) = seed_table(&state.db, workspace_id, "Tasks", &[("title", "text")]).await.unwrap();
    let (other, _) = seed_table(&state.db, workspace_id, "Notes", &[("body", "text")]).await.unwrap();
    let base_url = spawn_server(state.clone()).await;

    let mut alice = connect(&base_url, table.id).await;
    let mut bob = connect(&base_url, table.id).await;
    let mut carol = connect(&base_url, other.id).await;
    wait_for_connections(&state, table.id, 2).await;
    wait_for_connections(&state, other.id, 1).await;

    alice
        .send(Message::Text(r#"{"type":"cursor","row":1}"#.into()))
        .await
        .unwrap();
    assert_eq!(next_text(&mut bob).await, r#"{"type":"cursor","row":1}"#);
    assert_silent(&mut alice).await;
    assert_silent(&mut carol).await;

    bob.close(None).await.unwrap();
    wait_for_connections(&state, table.id, 1).await;

    alice.send(Message::Text("still here".into())).await.unwrap();
    assert_silent(&mut carol).await;

    // Server-side events still reach the remaining subscriber.
    let delivered = state
        .broadcaster
        .broadcast_json(table.id, &json!({"type": "row_created"}))
        .await;
    assert_eq!(delivered, 1);
    let event: serde_json::Value = serde_json::from_str(&next_text(&mut alice).await).unwrap();
    assert_eq!(event["type"], "row_created");
    assert_eq!(state.broadcaster.connection_count(other.id).await, 1);
}

#[tokio::test]
async fn unknown_table_is_refused() {
    let state = setup_test_state().await.unwrap();
    let base_url = spawn_server(state.clone()).await;

    let result = connect_async(format!("{base_url}/ws/tables/{}", Uuid::new_v4())).await;
    assert!(result.is_err());
    assert_eq!(state.broadcaster.table_count().await, 0);
}
