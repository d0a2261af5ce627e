// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Notification bus - latest alert snapshot fan-out

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, error};

use crate::alerts::Alert;

/// Subscriber callback, invoked with the full snapshot, newest first
pub type AlertCallback = Arc<dyn Fn(&[Alert]) + Send + Sync + 'static>;

/// Store contents at a given revision
#[derive(Debug, Clone, Default)]
pub struct AlertSnapshot {
    pub revision: u64,
    pub alerts: Arc<Vec<Alert>>,
}

impl AlertSnapshot {
    pub fn new(revision: u64, alerts: Vec<Alert>) -> Self {
        Self {
            revision,
            alerts: Arc::new(alerts),
        }
    }
}

struct Registry {
    next_id: u64,
    latest: AlertSnapshot,
    subscribers: HashMap<u64, watch::Sender<AlertSnapshot>>,
}

/// Fan-out of the latest alert snapshot.
///
/// Each subscriber owns a latest-value slot and a delivery task, so a
/// slow callback only ever sees the newest snapshot and never holds up
/// producers or other subscribers.
pub struct NotificationBus {
    registry: Arc<Mutex<Registry>>,
    latest_tx: watch::Sender<Arc<Vec<Alert>>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        let (latest_tx, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                latest: AlertSnapshot::default(),
                subscribers: HashMap::new(),
            })),
            latest_tx,
        }
    }

    /// Register a callback; it receives the current snapshot before returning.
    ///
    /// Inside a tokio runtime delivery runs as a task on that runtime.
    /// Otherwise the subscriber gets its own delivery thread.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&[Alert]) + Send + Sync + 'static,
    {
        let callback: AlertCallback = Arc::new(callback);

        let (id, current, rx) = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            let current = registry.latest.clone();
            let (tx, rx) = watch::channel(current.clone());
            registry.subscribers.insert(id, tx);
            (id, current, rx)
        };

        if catch_unwind(AssertUnwindSafe(|| callback(&current.alerts))).is_err() {
            error!("Subscriber {} panicked on initial snapshot", id);
        }

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(deliver(id, rx, callback));
            }
            Err(_) => {
                let spawned = std::thread::Builder::new()
                    .name(format!("alert-subscriber-{}", id))
                    .spawn(move || futures::executor::block_on(deliver_on_thread(id, rx, callback)));
                if let Err(e) = spawned {
                    error!("Subscriber {} has no delivery thread: {}", id, e);
                }
            }
        }
        debug!("Subscriber {} registered", id);

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Async consumers: a receiver that always holds the newest snapshot
    pub fn watch(&self) -> watch::Receiver<Arc<Vec<Alert>>> {
        self.latest_tx.subscribe()
    }

    /// Publish a snapshot; stale revisions are dropped
    pub fn broadcast(&self, snapshot: AlertSnapshot) {
        let mut registry = self.registry.lock();
        if snapshot.revision <= registry.latest.revision {
            debug!(
                "Skipping stale snapshot r{} (latest r{})",
                snapshot.revision, registry.latest.revision
            );
            return;
        }

        registry.latest = snapshot.clone();
        for tx in registry.subscribers.values() {
            tx.send_replace(snapshot.clone());
        }
        self.latest_tx.send_replace(snapshot.alerts);
    }

    pub fn latest(&self) -> AlertSnapshot {
        self.registry.lock().latest.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().subscribers.len()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

async fn deliver(id: u64, mut rx: watch::Receiver<AlertSnapshot>, callback: AlertCallback) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        let callback = callback.clone();

        if let Err(e) = tokio::task::spawn_blocking(move || callback(&snapshot.alerts)).await {
            if e.is_panic() {
                error!("Subscriber {} panicked: delivery skipped", id);
            }
        }
    }
    debug!("Subscriber {} delivery stopped", id);
}

/// Delivery loop for subscribers registered outside a runtime
async fn deliver_on_thread(id: u64, mut rx: watch::Receiver<AlertSnapshot>, callback: AlertCallback) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        if catch_unwind(AssertUnwindSafe(|| callback(&snapshot.alerts))).is_err() {
            error!("Subscriber {} panicked: delivery skipped", id);
        }
    }
    debug!("Subscriber {} delivery stopped", id);
}

/// Handle returned by [`NotificationBus::subscribe`]; unsubscribes on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn unsubscribe(self) {}

    fn remove(&self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.lock().subscribers.remove(&self.id).is_some() {
                debug!("Subscriber {} removed", self.id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::alerts::{AlertFactory, AlertType, CandidateEvent, Location, Severity};

    fn alert() -> Alert {
        let location = Location::new(0.0, 0.0, "Test");
        AlertFactory::new().from_candidate(CandidateEvent::new(
            AlertType::Poaching,
            Severity::High,
            &location,
            serde_json::json!({}),
        ))
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    #[tokio::test]
    async fn test_initial_empty_snapshot_is_immediate() {
        let bus = NotificationBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let _sub = bus.subscribe(move |alerts| sink.lock().push(alerts.len()));

        assert_eq!(*seen.lock(), vec![0]);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscribers() {
        let bus = NotificationBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let _sub = bus.subscribe(move |alerts| sink.lock().push(alerts.len()));
        bus.broadcast(AlertSnapshot::new(1, vec![alert()]));
        settle().await;

        assert_eq!(*seen.lock(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_panicking_subscriber_is_isolated() {
        let bus = NotificationBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _bad = bus.subscribe(|_| panic!("subscriber failure"));
        let sink = seen.clone();
        let _good = bus.subscribe(move |alerts| sink.lock().push(alerts.len()));

        bus.broadcast(AlertSnapshot::new(1, vec![alert()]));
        settle().await;
        bus.broadcast(AlertSnapshot::new(2, vec![alert(), alert()]));
        settle().await;

        assert_eq!(*seen.lock(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let bus = NotificationBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let sub = bus.subscribe(move |alerts| sink.lock().push(alerts.len()));
        assert_eq!(bus.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(bus.subscriber_count(), 0);

        bus.broadcast(AlertSnapshot::new(1, vec![alert()]));
        settle().await;
        assert_eq!(*seen.lock(), vec![0]);
    }

    #[tokio::test]
    async fn test_stale_revision_skipped() {
        let bus = NotificationBus::new();
        bus.broadcast(AlertSnapshot::new(3, vec![alert(), alert()]));
        bus.broadcast(AlertSnapshot::new(2, vec![alert()]));

        assert_eq!(bus.latest().revision, 3);
        assert_eq!(bus.watch().borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_slow_subscriber_gets_latest_value() {
        let bus = NotificationBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let _sub = bus.subscribe(move |alerts| {
            std::thread::sleep(Duration::from_millis(50));
            sink.lock().push(alerts.len());
        });

        for revision in 1..=5u64 {
            bus.broadcast(AlertSnapshot::new(revision, vec![alert(); revision as usize]));
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        let seen = seen.lock();
        assert_eq!(seen.last(), Some(&5));
        assert!(seen.len() < 6);
    }

    #[test]
    fn test_subscribe_without_runtime() {
        let bus = NotificationBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let sub = bus.subscribe(move |alerts| sink.lock().push(alerts.len()));
        assert_eq!(*seen.lock(), vec![0]);

        bus.broadcast(AlertSnapshot::new(1, vec![alert()]));
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(*seen.lock(), vec![0, 1]);

        sub.unsubscribe();
        bus.broadcast(AlertSnapshot::new(2, vec![alert(), alert()]));
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(*seen.lock(), vec![0, 1]);
    }
}
