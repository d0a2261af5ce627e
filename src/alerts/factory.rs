// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Alert factory - the only place alerts are created

use chrono::Utc;
use uuid::Uuid;

use super::{Alert, AlertStatus, AlertType, CandidateEvent, Location, Prediction, Severity};
use crate::analysis::MatchResult;

/// Version tag stamped into predictive alert payloads
pub const PREDICTIVE_MODEL_VERSION: &str = "2.1.0";

/// Normalizes generator, matcher and predictor output into [`Alert`]s
#[derive(Debug, Clone)]
pub struct AlertFactory {
    prediction_zone: Location,
}

impl AlertFactory {
    pub fn new() -> Self {
        Self {
            prediction_zone: Location::new(26.9124, 75.7873, "High Risk Zone"),
        }
    }

    /// Use a different location for predictive alerts
    pub fn with_prediction_zone(mut self, zone: Location) -> Self {
        self.prediction_zone = zone;
        self
    }

    pub fn from_candidate(&self, event: CandidateEvent) -> Alert {
        Alert {
            id: format!("alert_{}", Uuid::new_v4().simple()),
            alert_type: event.alert_type,
            severity: event.severity,
            location: event.location,
            timestamp: Utc::now(),
            prediction: None,
            data: event.data,
            status: AlertStatus::Active,
        }
    }

    /// Alert for an accepted acoustic match heard at `location`
    pub fn from_match(&self, result: &MatchResult, location: &Location) -> Alert {
        let (alert_type, severity) = if result.threat {
            let severity = if result.confidence >= 0.9 {
                Severity::Critical
            } else {
                Severity::High
            };
            (AlertType::AcousticThreat, severity)
        } else {
            (AlertType::AcousticSpecies, Severity::Low)
        };

        let percent = (result.confidence * 100.0).round() as u32;
        let data = serde_json::json!({
            "source": "acoustic_analyzer",
            "species": result.pattern_id,
            "confidence": percent,
            "frequencies": result.frequencies,
            "threat": result.threat,
        });

        self.from_candidate(CandidateEvent::new(alert_type, severity, location, data))
    }

    /// Predictive alert for a risk score that crossed its trigger;
    /// high severity above `high_above`, medium otherwise
    pub fn predictive(&self, alert_type: AlertType, risk: f64, high_above: f64) -> Alert {
        let risk = risk.clamp(0.0, 1.0);
        let severity = if risk > high_above { Severity::High } else { Severity::Medium };

        Alert {
            id: format!("predictive_{}", Uuid::new_v4().simple()),
            alert_type,
            severity,
            location: self.prediction_zone.clone(),
            timestamp: Utc::now(),
            prediction: Some(Prediction {
                confidence: (risk * 100.0).round() as u8,
                time_to_threat: ((1.0 - risk) * 120.0).round() as u32,
                risk_factors: risk_factors(alert_type).iter().map(|f| f.to_string()).collect(),
            }),
            data: serde_json::json!({
                "source": "predictive_model",
                "model_version": PREDICTIVE_MODEL_VERSION,
                "risk_score": risk,
            }),
            status: AlertStatus::Active,
        }
    }
}

impl Default for AlertFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed risk factor tags per predicted alert type
pub fn risk_factors(alert_type: AlertType) -> &'static [&'static str] {
    match alert_type {
        AlertType::Poaching => &[
            "nighttime_activity",
            "weekend_pattern",
            "recent_incidents",
            "remote_location",
        ],
        AlertType::HabitatDegradation => &[
            "deforestation_trend",
            "human_encroachment",
            "climate_stress",
            "industrial_activity",
        ],
        _ => &[],
    }
}
