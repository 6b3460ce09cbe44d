//! Connection watch
//!
//! Forwards store connectivity changes to the application event bus so the
//! dashboard can show the link state of the robot.

use cleanbot_core::event_bus::{AppEvent, ConnectionEvent, EventBus};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::store::{RealtimeStore, StoreEvent};

/// Republishes [`StoreEvent::ConnectionChanged`] as
/// [`ConnectionEvent::StateChanged`].
pub struct ConnectionWatcher {
    store: Arc<dyn RealtimeStore>,
    bus: Arc<EventBus>,
    connected: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionWatcher {
    pub fn new(store: Arc<dyn RealtimeStore>, bus: Arc<EventBus>) -> Self {
        let connected = Arc::new(AtomicBool::new(store.is_connected()));
        Self {
            store,
            bus,
            connected,
            task: Mutex::new(None),
        }
    }

    /// Last connectivity seen by the watcher.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().is_some()
    }

    /// Publishes the current state, then spawns the watch task.
    ///
    /// Calling `start` on a running watcher does nothing.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.is_some() {
            return;
        }

        let mut events = self.store.subscribe();
        let initial = self.store.is_connected();
        self.connected.store(initial, Ordering::SeqCst);
        self.bus.publish(AppEvent::Connection(ConnectionEvent::StateChanged {
            connected: initial,
        }));

        let bus = self.bus.clone();
        let connected = self.connected.clone();
        *task = Some(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(StoreEvent::ConnectionChanged { connected: now }) => {
                        if connected.swap(now, Ordering::SeqCst) != now {
                            tracing::info!("Robot link {}", if now { "up" } else { "down" });
                            bus.publish(AppEvent::Connection(ConnectionEvent::StateChanged {
                                connected: now,
                            }));
                        }
                    }
                    Ok(StoreEvent::ValueChanged { .. }) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Connection watch lagged, {} events dropped", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }));
    }

    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }
}

impl Drop for ConnectionWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
