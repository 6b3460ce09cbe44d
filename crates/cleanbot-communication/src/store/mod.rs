//! Realtime key/value store.
//!
//! The robot and the dashboard meet in a hierarchical JSON store addressed
//! by slash-separated paths (`esp32_cleaning_bot/triggers/command`). The
//! firmware watches the trigger keys; the dashboard writes them and keeps
//! saved routes alongside.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use cleanbot_core::StoreError;
use serde_json::{Map, Value};
use tokio::sync::broadcast;

/// Change notification pushed by a store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A value was written.
    ValueChanged { path: String, value: Value },
    /// The backend went online or offline.
    ConnectionChanged { connected: bool },
}

/// Hierarchical key/value store with push notifications.
#[async_trait]
pub trait RealtimeStore: Send + Sync {
    /// Writes `value` at `path`, creating intermediate nodes.
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Reads the value at `path`; `None` if nothing is stored there.
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Current connectivity.
    fn is_connected(&self) -> bool;

    /// Subscribes to value and connectivity changes.
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

const FORBIDDEN_KEY_CHARS: [char; 5] = ['.', '#', '$', '[', ']'];

/// Splits `path` into keys, rejecting empty keys and reserved characters.
pub fn split_path(path: &str) -> Result<Vec<&str>, StoreError> {
    let keys: Vec<&str> = path.split('/').collect();
    for key in &keys {
        if key.is_empty() {
            return Err(StoreError::InvalidPath {
                path: path.to_string(),
                reason: "empty key".to_string(),
            });
        }
        if let Some(c) = key.chars().find(|c| FORBIDDEN_KEY_CHARS.contains(c)) {
            return Err(StoreError::InvalidPath {
                path: path.to_string(),
                reason: format!("key '{}' contains '{}'", key, c),
            });
        }
    }
    Ok(keys)
}

/// Value under `keys` in `root`.
pub(crate) fn value_at<'a>(root: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(root, |node, key| node.get(*key))
}

/// Stores `value` under `keys`, replacing non-object nodes on the way.
pub(crate) fn insert_at(root: &mut Value, keys: &[&str], value: Value) {
    let mut node = root;
    for key in keys {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = match node {
            Value::Object(map) => map.entry((*key).to_string()).or_insert(Value::Null),
            _ => return,
        };
    }
    *node = value;
}
