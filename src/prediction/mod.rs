//! Predictive risk engine - composite risk scores and predictive alerts

use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Local, NaiveDateTime, Timelike, Utc, Weekday};
use parking_lot::RwLock;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::alerts::{Alert, AlertFactory, AlertStore, AlertType};
use crate::config::PredictionConfig;
use crate::core::{AlertPipeline, PeriodicTask};

/// Current composite risk scalars, each in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskModel {
    pub poaching_risk: f64,
    pub habitat_degradation: f64,
    pub wildlife_stress: f64,
    pub environmental_threats: f64,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Alert counts in the trailing activity window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    pub poaching: usize,
    pub habitat_degradation: usize,
    /// Wildlife movement plus acoustic species detections
    pub wildlife: usize,
    pub environmental: usize,
}

impl ActivityCounts {
    pub fn from_store(store: &AlertStore, window: chrono::Duration, now: DateTime<Utc>) -> Self {
        Self {
            poaching: store.count_recent(AlertType::Poaching, window, now),
            habitat_degradation: store.count_recent(AlertType::HabitatDegradation, window, now),
            wildlife: store.count_recent(AlertType::WildlifeMovement, window, now)
                + store.count_recent(AlertType::AcousticSpecies, window, now),
            environmental: store.count_recent(AlertType::Environmental, window, now),
        }
    }
}

/// Time-of-day factor: nights score higher
fn hour_factor(hour: u32) -> f64 {
    if hour < 6 || hour > 20 {
        0.8
    } else {
        0.3
    }
}

fn weekend_factor(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Sat | Weekday::Sun => 0.7,
        _ => 0.4,
    }
}

/// Recent poaching activity, saturating at five incidents
fn activity_factor(count: usize) -> f64 {
    (0.2 * count as f64).min(1.0)
}

/// Recomputes the risk model and raises predictive alerts
pub struct PredictiveRiskEngine {
    config: PredictionConfig,
    factory: AlertFactory,
    rng: StdRng,
}

impl PredictiveRiskEngine {
    pub fn new(config: PredictionConfig, factory: AlertFactory) -> Self {
        Self {
            config,
            factory,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    /// Score the current situation at local time `local`
    pub fn assess(&mut self, counts: &ActivityCounts, local: NaiveDateTime) -> RiskModel {
        let environmental_noise: f64 = self.rng.gen_range(0.0..0.5);
        let poaching_risk: f64 = (hour_factor(local.hour())
            + weekend_factor(local.weekday())
            + environmental_noise
            + activity_factor(counts.poaching))
            / 4.0;

        let habitat_degradation: f64 = 0.3 + self.rng.gen_range(0.0..0.5);

        let wildlife_stress: f64 =
            (0.15 * counts.wildlife as f64).min(0.6) + self.rng.gen_range(0.0..1.0) * 0.4;

        let environmental_threats: f64 =
            (0.2 * counts.environmental as f64).min(0.7) + self.rng.gen_range(0.0..0.3);

        RiskModel {
            poaching_risk: poaching_risk.clamp(0.0, 1.0),
            habitat_degradation: habitat_degradation.clamp(0.0, 1.0),
            wildlife_stress: wildlife_stress.clamp(0.0, 1.0),
            environmental_threats: environmental_threats.clamp(0.0, 1.0),
            last_updated: Some(Utc::now()),
        }
    }

    /// Predictive alerts for every score above its trigger
    pub fn triggered(&self, model: &RiskModel) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if model.poaching_risk > self.config.poaching_trigger {
            alerts.push(self.predict(AlertType::Poaching, model.poaching_risk));
        }
        if model.habitat_degradation > self.config.habitat_trigger {
            alerts.push(self.predict(AlertType::HabitatDegradation, model.habitat_degradation));
        }

        alerts
    }

    fn predict(&self, alert_type: AlertType, risk: f64) -> Alert {
        let alert = self
            .factory
            .predictive(alert_type, risk, self.config.high_severity_above);
        info!(
            "Predicted {} risk {:.2} ({:?})",
            alert_type.as_str(),
            risk,
            alert.severity
        );
        alert
    }
}

/// Periodic task driving the risk engine against the live store
pub struct PredictionTask {
    engine: PredictiveRiskEngine,
    pipeline: Arc<AlertPipeline>,
    model: Arc<RwLock<RiskModel>>,
}

impl PredictionTask {
    pub fn new(engine: PredictiveRiskEngine, pipeline: Arc<AlertPipeline>, model: Arc<RwLock<RiskModel>>) -> Self {
        Self {
            engine,
            pipeline,
            model,
        }
    }
}

#[async_trait]
impl PeriodicTask for PredictionTask {
    fn name(&self) -> &str {
        "predictive-risk"
    }

    async fn tick(&mut self) -> anyhow::Result<()> {
        let window = self.engine.config().activity_window();
        let counts = self
            .pipeline
            .read(|store| ActivityCounts::from_store(store, window, Utc::now()));

        let model = self.engine.assess(&counts, Local::now().naive_local());
        debug!(
            "Risk model: poaching {:.2}, habitat {:.2}, wildlife {:.2}, environmental {:.2}",
            model.poaching_risk, model.habitat_degradation, model.wildlife_stress, model.environmental_threats
        );

        let alerts = self.engine.triggered(&model);
        *self.model.write() = model;
        self.pipeline.publish_alerts(alerts);
        Ok(())
    }
}
