//! # Realtime Broadcaster
//!
//! In-process publish/subscribe registry that fans messages out to the WebSocket
//! connections subscribed to a data table. Each connection owns an unbounded channel;
//! the socket task drains it into the socket. Nothing is persisted or replayed, and
//! delivery is limited to this process.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// Identifies one open socket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

type Subscribers = HashMap<ConnectionId, mpsc::UnboundedSender<String>>;

/// Registry of open connections keyed by table id.
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone, Default)]
pub struct TableBroadcaster {
    tables: Arc<RwLock<HashMap<Uuid, Subscribers>>>,
}

impl TableBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a new connection to `table_id`, returning its id and message receiver.
    pub async fn register(&self, table_id: Uuid) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::new();

        let mut tables = self.tables.write().await;
        tables.entry(table_id).or_default().insert(connection_id, tx);

        tracing::debug!(%table_id, %connection_id, "WebSocket subscriber registered");
        (connection_id, rx)
    }

    /// Removes a connection; the table entry goes away with its last connection.
    pub async fn unregister(&self, table_id: Uuid, connection_id: ConnectionId) {
        let mut tables = self.tables.write().await;
        if let Some(subscribers) = tables.get_mut(&table_id) {
            subscribers.remove(&connection_id);
            if subscribers.is_empty() {
                tables.remove(&table_id);
            }
        }
        tracing::debug!(%table_id, %connection_id, "WebSocket subscriber unregistered");
    }

    /// Delivers `message` to every connection on `table_id` except `except`.
    ///
    /// Connections whose channel is closed are pruned. Returns the number of deliveries.
    pub async fn broadcast(
        &self,
        table_id: Uuid,
        message: &str,
        except: Option<ConnectionId>,
    ) -> usize {
        let mut delivered = 0;
        let mut failed = Vec::new();

        {
            let tables = self.tables.read().await;
            let Some(subscribers) = tables.get(&table_id) else {
                return 0;
            };

            for (connection_id, sender) in subscribers {
                if Some(*connection_id) == except {
                    continue;
                }
                if sender.send(message.to_owned()).is_ok() {
                    delivered += 1;
                } else {
                    failed.push(*connection_id);
                }
            }
        }

        if !failed.is_empty() {
            let mut tables = self.tables.write().await;
            if let Some(subscribers) = tables.get_mut(&table_id) {
                for connection_id in &failed {
                    subscribers.remove(connection_id);
                }
                if subscribers.is_empty() {
                    tables.remove(&table_id);
                }
            }
            tracing::debug!(%table_id, pruned = failed.len(), "Pruned dead WebSocket subscribers");
            counter!("realtime_pruned_connections_total").increment(failed.len() as u64);
        }

        counter!("realtime_messages_delivered_total").increment(delivered as u64);
        delivered
    }

    /// Serializes `payload` once and broadcasts it to every connection on `table_id`.
    pub async fn broadcast_json<T: Serialize>(&self, table_id: Uuid, payload: &T) -> usize {
        match serde_json::to_string(payload) {
            Ok(message) => self.broadcast(table_id, &message, None).await,
            Err(error) => {
                tracing::warn!(%table_id, %error, "Failed to serialize broadcast payload");
                0
            }
        }
    }

    /// Number of open connections on `table_id`.
    pub async fn connection_count(&self, table_id: Uuid) -> usize {
        self.tables
            .read()
            .await
            .get(&table_id)
            .map_or(0, HashMap::len)
    }

    /// Number of tables with at least one open connection.
    pub async fn table_count(&self) -> usize {
        self.tables.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn broadcast_skips_sender_and_other_tables() {
        let broadcaster = TableBroadcaster::new();
        let table = Uuid::new_v4();
        let other_table = Uuid::new_v4();

        let (a, mut rx_a) = broadcaster.register(table).await;
        let (_b, mut rx_b) = broadcaster.register(table).await;
        let (_c, mut rx_c) = broadcaster.register(other_table).await;

        let delivered = broadcaster.broadcast(table, "hello", Some(a)).await;

        assert_eq!(delivered, 1);
        assert_eq!(rx_b.recv().await.as_deref(), Some("hello"));
        assert!(rx_a.try_recv().is_err());
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_connections_are_pruned() {
        let broadcaster = TableBroadcaster::new();
        let table = Uuid::new_v4();
        let other_table = Uuid::new_v4();

        let (a, _rx_a) = broadcaster.register(table).await;
        let (_b, rx_b) = broadcaster.register(table).await;
        let (_c, _rx_c) = broadcaster.register(other_table).await;
        drop(rx_b);

        assert_eq!(broadcaster.broadcast(table, "ping", Some(a)).await, 0);
        assert_eq!(broadcaster.connection_count(table).await, 1);
        assert_eq!(broadcaster.connection_count(other_table).await, 1);
    }

    #[tokio::test]
    async fn table_entry_removed_with_last_connection() {
        let broadcaster = TableBroadcaster::new();
        let table = Uuid::new_v4();

        let (only, rx) = broadcaster.register(table).await;
        assert_eq!(broadcaster.table_count().await, 1);

        drop(rx);
        broadcaster.broadcast(table, "gone", None).await;
        assert_eq!(broadcaster.table_count().await, 0);

        // Unregistering an already pruned connection is a no-op.
        broadcaster.unregister(table, only).await;
        assert_eq!(broadcaster.table_count().await, 0);
    }

    #[tokio::test]
    async fn json_payloads_are_serialized_once_for_all_subscribers() {
        let broadcaster = TableBroadcaster::new();
        let table = Uuid::new_v4();
        let (_a, mut rx_a) = broadcaster.register(table).await;
        let (_b, mut rx_b) = broadcaster.register(table).await;

        let payload = json!({"type": "row_updated", "row_id": "r1"});
        assert_eq!(broadcaster.broadcast_json(table, &payload).await, 2);

        let first: serde_json::Value = serde_json::from_str(&rx_a.recv().await.unwrap()).unwrap();
        let second: serde_json::Value = serde_json::from_str(&rx_b.recv().await.unwrap()).unwrap();
        assert_eq!(first, payload);
        assert_eq!(second, payload);
    }

    #[tokio::test]
    async fn broadcast_to_unknown_table_is_noop() {
        let broadcaster = TableBroadcaster::new();
        assert_eq!(broadcaster.broadcast(Uuid::new_v4(), "x", None).await, 0);
        assert_eq!(broadcaster.table_count().await, 0);
    }
}
