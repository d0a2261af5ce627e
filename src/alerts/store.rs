// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Bounded alert store - newest first, oldest evicted on overflow

use std::collections::{BTreeMap, VecDeque};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{Alert, AlertStatus, AlertType, Severity};

/// Default number of retained alerts
pub const DEFAULT_CAPACITY: usize = 50;

/// Aggregated alert counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertStats {
    /// Alerts currently retained
    pub total: usize,
    /// Alerts inside the trailing window
    pub last_24h: usize,
    /// Critical alerts inside the trailing window
    pub critical: usize,
    /// Retained alerts still in `Active` status
    pub active: usize,
    /// Per-type counts inside the trailing window
    pub by_type: BTreeMap<AlertType, usize>,
    /// Per-severity counts inside the trailing window
    pub by_severity: BTreeMap<Severity, usize>,
}

/// Ordered, capacity-bounded alert collection
#[derive(Debug)]
pub struct AlertStore {
    alerts: VecDeque<Alert>,
    capacity: usize,
    revision: u64,
}

impl AlertStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            alerts: VecDeque::with_capacity(capacity + 1),
            capacity,
            revision: 0,
        }
    }

    /// Insert at the head. Returns the evicted alert when over capacity.
    pub fn insert(&mut self, alert: Alert) -> Option<Alert> {
        self.alerts.push_front(alert);
        self.revision += 1;

        if self.alerts.len() > self.capacity {
            self.alerts.pop_back()
        } else {
            None
        }
    }

    /// Copy of all retained alerts, newest first
    pub fn snapshot(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    pub fn newest(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Status is the only field mutated after insertion
    pub(crate) fn set_status(&mut self, id: &str, status: AlertStatus) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.status = status;
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Incremented on every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Alerts of `alert_type` newer than `now - window`
    pub fn count_recent(&self, alert_type: AlertType, window: Duration, now: DateTime<Utc>) -> usize {
        let cutoff = cutoff(now, window);
        self.alerts
            .iter()
            .filter(|a| a.alert_type == alert_type && a.timestamp > cutoff)
            .count()
    }

    pub fn stats(&self, window: Duration, now: DateTime<Utc>) -> AlertStats {
        let cutoff = cutoff(now, window);

        let mut by_type: BTreeMap<AlertType, usize> = AlertType::ALL.iter().map(|t| (*t, 0)).collect();
        let mut by_severity: BTreeMap<Severity, usize> = Severity::ALL.iter().map(|s| (*s, 0)).collect();
        let mut last_24h = 0;

        for alert in self.alerts.iter().filter(|a| a.timestamp > cutoff) {
            last_24h += 1;
            *by_type.entry(alert.alert_type).or_insert(0) += 1;
            *by_severity.entry(alert.severity).or_insert(0) += 1;
        }

        AlertStats {
            total: self.alerts.len(),
            last_24h,
            critical: by_severity[&Severity::Critical],
            active: self.alerts.iter().filter(|a| a.status == AlertStatus::Active).count(),
            by_type,
            by_severity,
        }
    }
}

/// Start of the trailing window; saturates at the earliest representable time
fn cutoff(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
