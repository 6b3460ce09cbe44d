//! In-process store backend.

use async_trait::async_trait;
use cleanbot_core::{thread_safe_rw, StoreError, ThreadSafeRw};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

use super::{insert_at, split_path, value_at, RealtimeStore, StoreEvent};

/// Store that keeps the whole tree in memory.
///
/// Starts connected. While disconnected every read and write fails with
/// [`StoreError::NotConnected`], which is how tests simulate a dropped link.
pub struct MemoryStore {
    root: ThreadSafeRw<Value>,
    connected: AtomicBool,
    events: broadcast::Sender<StoreEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(1024);
        Self {
            root: thread_safe_rw(Value::Object(Map::new())),
            connected: AtomicBool::new(true),
            events,
        }
    }

    /// Changes connectivity and notifies subscribers if it changed.
    pub fn set_connected(&self, connected: bool) {
        let previous = self.connected.swap(connected, Ordering::SeqCst);
        if previous != connected {
            tracing::info!("Memory store {}", if connected { "online" } else { "offline" });
            let _ = self.events.send(StoreEvent::ConnectionChanged { connected });
        }
    }

    /// Copy of the whole tree.
    pub fn snapshot(&self) -> Value {
        self.root.read().clone()
    }

    fn ensure_connected(&self) -> Result<(), StoreError> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::NotConnected)
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeStore for MemoryStore {
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.ensure_connected()?;
        let keys = split_path(path)?;
        insert_at(&mut self.root.write(), &keys, value.clone());
        tracing::trace!("set {} = {}", path, value);
        let _ = self.events.send(StoreEvent::ValueChanged {
            path: path.to_string(),
            value,
        });
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.ensure_connected()?;
        let keys = split_path(path)?;
        Ok(value_at(&self.root.read(), &keys).cloned())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();
        store.set("bot/triggers/command", json!("F")).await.unwrap();
        assert_eq!(
            store.get("bot/triggers/command").await.unwrap(),
            Some(json!("F"))
        );
        assert_eq!(store.get("bot/triggers/speed").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_disconnected_store_rejects_writes() {
        let store = MemoryStore::new();
        store.set_connected(false);
        assert_eq!(
            store.set("bot/x", json!(1)).await,
            Err(StoreError::NotConnected)
        );
        assert!(!store.is_connected());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe();

        store.set("bot/triggers/speed", json!(170)).await.unwrap();
        store.set_connected(false);
        store.set_connected(false);

        assert_eq!(
            rx.recv().await.unwrap(),
            StoreEvent::ValueChanged {
                path: "bot/triggers/speed".to_string(),
                value: json!(170)
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            StoreEvent::ConnectionChanged { connected: false }
        );
        assert!(rx.try_recv().is_err());
    }
}
