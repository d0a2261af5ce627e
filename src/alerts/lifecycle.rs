// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Alert lifecycle - forward-only status transitions

use tracing::debug;

use super::{AlertStatus, AlertStore};
use crate::error::{MonitorError, MonitorResult};

impl AlertStatus {
    /// Legal moves: active -> investigating, active -> resolved, investigating -> resolved
    pub fn can_transition_to(self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (AlertStatus::Active, AlertStatus::Investigating)
                | (AlertStatus::Active, AlertStatus::Resolved)
                | (AlertStatus::Investigating, AlertStatus::Resolved)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == AlertStatus::Resolved
    }
}

/// Applies status changes to stored alerts
#[derive(Debug, Clone, Default)]
pub struct AlertLifecycleManager;

impl AlertLifecycleManager {
    pub fn new() -> Self {
        Self
    }

    /// Move `id` to `requested`, returning the previous status.
    ///
    /// The store is left untouched on any error.
    pub fn set_status(
        &self,
        store: &mut AlertStore,
        id: &str,
        requested: AlertStatus,
    ) -> MonitorResult<AlertStatus> {
        let current = store
            .get(id)
            .map(|a| a.status)
            .ok_or_else(|| MonitorError::UnknownAlert(id.to_string()))?;

        if !current.can_transition_to(requested) {
            return Err(MonitorError::IllegalTransition {
                id: id.to_string(),
                from: current,
                to: requested,
            });
        }

        store.set_status(id, requested);
        debug!("Alert {} moved {:?} -> {:?}", id, current, requested);
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertFactory, AlertType, CandidateEvent, Location, Severity};

    fn store_with_alert() -> (AlertStore, String) {
        let factory = AlertFactory::new();
        let mut store = AlertStore::default();
        let alert = factory.from_candidate(CandidateEvent::new(
            AlertType::Poaching,
            Severity::Critical,
            &Location::new(21.1702, 79.0, "Tadoba"),
            serde_json::json!({"source": "camera_trap"}),
        ));
        let id = alert.id.clone();
        store.insert(alert);
        (store, id)
    }

    #[test]
    fn test_resolve_then_reactivate_fails() {
        let (mut store, id) = store_with_alert();
        let lifecycle = AlertLifecycleManager::new();

        assert_eq!(lifecycle.set_status(&mut store, &id, AlertStatus::Resolved), Ok(AlertStatus::Active));
        assert_eq!(store.get(&id).unwrap().status, AlertStatus::Resolved);

        let err = lifecycle.set_status(&mut store, &id, AlertStatus::Active).unwrap_err();
        assert!(matches!(err, MonitorError::IllegalTransition { .. }));
        assert_eq!(store.get(&id).unwrap().status, AlertStatus::Resolved);
    }

    #[test]
    fn test_investigation_path() {
        let (mut store, id) = store_with_alert();
        let lifecycle = AlertLifecycleManager::new();
        let revision = store.revision();

        lifecycle.set_status(&mut store, &id, AlertStatus::Investigating).unwrap();
        assert!(lifecycle.set_status(&mut store, &id, AlertStatus::Active).is_err());
        assert!(lifecycle.set_status(&mut store, &id, AlertStatus::Investigating).is_err());
        lifecycle.set_status(&mut store, &id, AlertStatus::Resolved).unwrap();

        assert_eq!(store.revision(), revision + 2);
    }

    #[test]
    fn test_unknown_alert() {
        let (mut store, _) = store_with_alert();
        let lifecycle = AlertLifecycleManager::new();
        let revision = store.revision();

        let err = lifecycle.set_status(&mut store, "missing", AlertStatus::Resolved).unwrap_err();
        assert_eq!(err, MonitorError::UnknownAlert("missing".to_string()));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_transition_table() {
        use AlertStatus::*;
        for from in [Active, Investigating, Resolved] {
            for to in [Active, Investigating, Resolved] {
                let expected = matches!((from, to), (Active, Investigating) | (Active, Resolved) | (Investigating, Resolved));
                assert_eq!(from.can_transition_to(to), expected, "{:?} -> {:?}", from, to);
            }
        }
        assert!(Resolved.is_terminal());
    }
}
