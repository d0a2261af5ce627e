//! Core engine module - alert pipeline, notification bus and scheduling

mod engine;
mod notification_bus;
mod pipeline;
mod scheduler;

pub use engine::Engine;
pub use notification_bus::{AlertCallback, AlertSnapshot, NotificationBus, Subscription};
pub use pipeline::AlertPipeline;
pub use scheduler::{PeriodicTask, Scheduler};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// System-wide state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemState {
    pub running: bool,
    pub generators_active: usize,
    pub acoustic_capture: bool,
    pub total_alerts: u64,
    pub alerts_retained: usize,
    pub subscribers: usize,
    pub uptime_seconds: u64,
    pub last_alert: Option<DateTime<Utc>>,
}
