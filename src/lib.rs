// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! VanRakshak - Forest Threat Detection & Predictive Alerting
//!
//! Real-time wildlife protection engine with:
//! - Acoustic signature matching for species calls and threat sounds
//! - Rule-based event generators for acoustic, camera trap, satellite and weather feeds
//! - Bounded alert store with an explicit review lifecycle
//! - Composite poaching / habitat risk prediction
//! - Last-value-wins alert notification for any number of subscribers
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      VanRakshak Engine                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐  ┌──────────┐  ┌────────────┐                │
//! │  │ Generators │  │ Acoustic │  │ Predictive │   (scheduler)  │
//! │  │ x4 feeds   │  │ Matcher  │  │ Risk       │                │
//! │  └────────────┘  └──────────┘  └────────────┘                │
//! │        ↓              ↓              ↓                       │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │        Alert Pipeline (factory → store → lifecycle)     │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                           ↓                                  │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                  Notification Bus                       │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod alerts;
pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod prediction;
pub mod sensors;

// Re-exports for convenience
pub use alerts::{Alert, AlertStats, AlertStatus, AlertType, Location, Severity};
pub use analysis::{AcousticMatcher, PatternLibrary, SpectrumAnalysis, SpectrumSample};
pub use config::Config;
pub use self::core::{Engine, NotificationBus, Subscription, SystemState};
pub use error::{MonitorError, MonitorResult};
pub use prediction::{PredictiveRiskEngine, RiskModel};
pub use sensors::{EventGenerator, SensorKind, SensorManager, SensorSource};

/// VanRakshak version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VanRakshak name
pub const NAME: &str = "VanRakshak";
