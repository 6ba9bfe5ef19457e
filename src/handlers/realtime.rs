//! # Realtime WebSocket Handler
//!
//! Clients subscribe to one data table. Text frames a client sends are relayed verbatim to
//! every other subscriber of that table; server-side mutations reach the same subscribers
//! through [`crate::realtime::TableBroadcaster`].

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use crate::error::ApiError;
use crate::realtime::TableBroadcaster;
use crate::repositories::DataTableRepository;
use crate::server::AppState;

/// Upgrade to a WebSocket subscribed to a table's events
#[utoipa::path(
    get,
    path = "/ws/tables/{table_id}",
    params(("table_id" = Uuid, Path, description = "Data table ID")),
    responses(
        (status = 101, description = "Switching to the WebSocket protocol"),
        (status = 404, description = "Data table not found", body = ApiError)
    ),
    tag = "realtime"
)]
pub async fn table_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(table_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    DataTableRepository::new(&state.db).find(table_id).await?;

    let broadcaster = state.broadcaster.clone();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, broadcaster, table_id)))
}

async fn handle_socket(socket: WebSocket, broadcaster: TableBroadcaster, table_id: Uuid) {
    let (connection_id, mut outbound) = broadcaster.register(table_id).await;
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            if sender.send(Message::Text(message.into())).await.is_err() {
                break;
            }
        }
    });

    let relay = broadcaster.clone();
    let mut receive_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    relay
                        .broadcast(table_id, text.as_str(), Some(connection_id))
                        .await;
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(error) => {
                    tracing::debug!(%table_id, %connection_id, %error, "WebSocket receive failed");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => receive_task.abort(),
        _ = &mut receive_task => send_task.abort(),
    }

    broadcaster.unregister(table_id, connection_id).await;
}
