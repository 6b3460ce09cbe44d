//! Store backend persisted to a local JSON document.

use async_trait::async_trait;
use cleanbot_core::{thread_safe_rw, StoreError, ThreadSafeRw};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::{broadcast, Mutex};

use super::{insert_at, split_path, value_at, RealtimeStore, StoreEvent};

/// Store whose tree lives in a single JSON file.
///
/// The file is read once on open and rewritten after every `set`. A local
/// file is always reachable, so the store reports itself connected.
pub struct JsonFileStore {
    path: PathBuf,
    root: ThreadSafeRw<Value>,
    write_lock: Mutex<()>,
    events: broadcast::Sender<StoreEvent>,
}

impl JsonFileStore {
    /// Opens the document at `path`, starting empty if it does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let root = match tokio::fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => Value::Object(Map::new()),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Value::Object(Map::new()),
            Err(e) => return Err(e.into()),
        };
        tracing::info!("Opened store file {}", path.display());

        let (events, _) = broadcast::channel(1024);
        Ok(Self {
            path,
            root: thread_safe_rw(root),
            write_lock: Mutex::new(()),
            events,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, tree: &Value) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(tree)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RealtimeStore for JsonFileStore {
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let keys = split_path(path)?;
        let _guard = self.write_lock.lock().await;
        // The in-memory tree only changes once the file is written
        let mut next = self.root.read().clone();
        insert_at(&mut next, &keys, value.clone());
        self.persist(&next).await?;
        *self.root.write() = next;
        let _ = self.events.send(StoreEvent::ValueChanged {
            path: path.to_string(),
            value,
        });
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let keys = split_path(path)?;
        Ok(value_at(&self.root.read(), &keys).cloned())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
