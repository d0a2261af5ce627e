// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Alert pipeline - single writer over the alert store

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::{AlertSnapshot, NotificationBus};
use crate::alerts::{Alert, AlertFactory, AlertLifecycleManager, AlertStats, AlertStatus, AlertStore, CandidateEvent};
use crate::config::AlertConfig;

/// Owns the alert store; every insert and status change goes through here
/// and is broadcast once the store lock is released
pub struct AlertPipeline {
    store: Mutex<AlertStore>,
    factory: AlertFactory,
    lifecycle: AlertLifecycleManager,
    bus: Arc<NotificationBus>,
    config: AlertConfig,
    total_alerts: AtomicU64,
    total_evicted: AtomicU64,
}

impl AlertPipeline {
    pub fn new(config: AlertConfig, factory: AlertFactory, bus: Arc<NotificationBus>) -> Self {
        Self {
            store: Mutex::new(AlertStore::new(config.capacity)),
            factory,
            lifecycle: AlertLifecycleManager::new(),
            bus,
            config,
            total_alerts: AtomicU64::new(0),
            total_evicted: AtomicU64::new(0),
        }
    }

    pub fn factory(&self) -> &AlertFactory {
        &self.factory
    }

    pub fn bus(&self) -> &Arc<NotificationBus> {
        &self.bus
    }

    /// Turn candidate events into alerts and record them
    pub fn publish_candidates(&self, events: Vec<CandidateEvent>) -> usize {
        let alerts: Vec<Alert> = events.into_iter().map(|e| self.factory.from_candidate(e)).collect();
        self.publish_alerts(alerts)
    }

    /// Record already-built alerts, newest last in `alerts`
    pub fn publish_alerts(&self, alerts: Vec<Alert>) -> usize {
        if alerts.is_empty() {
            return 0;
        }

        let count = alerts.len();
        let snapshot = {
            let mut store = self.store.lock();
            for alert in alerts {
                debug!("Alert {} ({} / {:?})", alert.id, alert.alert_type.as_str(), alert.severity);
                if let Some(evicted) = store.insert(alert) {
                    debug!("Evicted alert {}", evicted.id);
                    self.total_evicted.fetch_add(1, Ordering::Relaxed);
                }
            }
            AlertSnapshot::new(store.revision(), store.snapshot())
        };

        self.total_alerts.fetch_add(count as u64, Ordering::Relaxed);
        self.bus.broadcast(snapshot);
        count
    }

    /// Apply a lifecycle transition; false on unknown id or illegal move
    pub fn update_status(&self, id: &str, status: AlertStatus) -> bool {
        let outcome = {
            let mut store = self.store.lock();
            self.lifecycle
                .set_status(&mut store, id, status)
                .map(|previous| (previous, AlertSnapshot::new(store.revision(), store.snapshot())))
        };

        match outcome {
            Ok((previous, snapshot)) => {
                info!("Alert {} status {:?} -> {:?}", id, previous, status);
                self.bus.broadcast(snapshot);
                true
            }
            Err(e) => {
                warn!("Status update rejected: {}", e);
                false
            }
        }
    }

    pub fn snapshot(&self) -> Vec<Alert> {
        self.store.lock().snapshot()
    }

    pub fn stats(&self) -> AlertStats {
        self.store.lock().stats(self.config.stats_window(), Utc::now())
    }

    /// Read-only access to the store under its lock
    pub fn read<R>(&self, f: impl FnOnce(&AlertStore) -> R) -> R {
        f(&self.store.lock())
    }

    pub fn total_alerts(&self) -> u64 {
        self.total_alerts.load(Ordering::Relaxed)
    }

    pub fn total_evicted(&self) -> u64 {
        self.total_evicted.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertType, Location, Severity};

    fn pipeline(capacity: usize) -> AlertPipeline {
        AlertPipeline::new(
            AlertConfig { capacity, ..Default::default() },
            AlertFactory::new(),
            Arc::new(NotificationBus::new()),
        )
    }

    fn candidate(severity: Severity) -> CandidateEvent {
        let location = Location::new(26.9124, 75.7873, "Ranthambore");
        CandidateEvent::new(AlertType::Poaching, severity, &location, serde_json::json!({}))
    }

    #[test]
    fn test_publish_updates_store_and_bus() {
        let pipeline = pipeline(50);
        assert_eq!(pipeline.publish_candidates(vec![candidate(Severity::High), candidate(Severity::Low)]), 2);

        let alerts = pipeline.snapshot();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, Severity::Low);
        assert_eq!(pipeline.bus().latest().alerts.len(), 2);
        assert_eq!(pipeline.publish_candidates(Vec::new()), 0);
    }

    #[test]
    fn test_eviction_counted() {
        let pipeline = pipeline(3);
        for _ in 0..5 {
            pipeline.publish_candidates(vec![candidate(Severity::Medium)]);
        }
        assert_eq!(pipeline.snapshot().len(), 3);
        assert_eq!(pipeline.total_alerts(), 5);
        assert_eq!(pipeline.total_evicted(), 2);
    }

    #[test]
    fn test_status_update_broadcasts_only_on_success() {
        let pipeline = pipeline(50);
        pipeline.publish_candidates(vec![candidate(Severity::Critical)]);
        let id = pipeline.snapshot()[0].id.clone();
        let before = pipeline.bus().latest().revision;

        assert!(pipeline.update_status(&id, AlertStatus::Resolved));
        let after = pipeline.bus().latest().revision;
        assert!(after > before);

        assert!(!pipeline.update_status(&id, AlertStatus::Active));
        assert!(!pipeline.update_status("alert_missing", AlertStatus::Resolved));
        assert_eq!(pipeline.bus().latest().revision, after);
        assert_eq!(pipeline.stats().active, 0);
    }
}
