//! Alert module - canonical alert model, factory, bounded store and lifecycle

mod factory;
mod lifecycle;
mod store;

pub use factory::*;
pub use lifecycle::*;
pub use store::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alert category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Poaching,
    HabitatDegradation,
    WildlifeMovement,
    Environmental,
    AcousticSpecies,
    AcousticThreat,
}

impl AlertType {
    /// Every alert type, in declaration order
    pub const ALL: [AlertType; 6] = [
        AlertType::Poaching,
        AlertType::HabitatDegradation,
        AlertType::WildlifeMovement,
        AlertType::Environmental,
        AlertType::AcousticSpecies,
        AlertType::AcousticThreat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Poaching => "poaching",
            AlertType::HabitatDegradation => "habitat_degradation",
            AlertType::WildlifeMovement => "wildlife_movement",
            AlertType::Environmental => "environmental",
            AlertType::AcousticSpecies => "acoustic_species",
            AlertType::AcousticThreat => "acoustic_threat",
        }
    }
}

/// Severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Low, Severity::Medium, Severity::High, Severity::Critical];
}

/// Lifecycle status of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Active,
    Investigating,
    Resolved,
}

/// Geographic position of the reporting station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub region: String,
}

impl Location {
    pub fn new(lat: f64, lng: f64, region: &str) -> Self {
        Self {
            lat,
            lng,
            region: region.to_string(),
        }
    }
}

/// Forecast attached to alerts synthesized by the risk engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Confidence in percent (0-100)
    pub confidence: u8,
    /// Estimated minutes until the threat materializes
    pub time_to_threat: u32,
    pub risk_factors: Vec<String>,
}

/// Canonical alert record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub location: Location,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
    /// Source payload, opaque to the core
    pub data: serde_json::Value,
    pub status: AlertStatus,
}

impl Alert {
    pub fn is_predictive(&self) -> bool {
        self.prediction.is_some()
    }
}

/// Event proposed by a sensor generator before normalization
#[derive(Debug, Clone)]
pub struct CandidateEvent {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub location: Location,
    pub data: serde_json::Value,
}

impl CandidateEvent {
    pub fn new(alert_type: AlertType, severity: Severity, location: &Location, data: serde_json::Value) -> Self {
        Self {
            alert_type,
            severity,
            location: location.clone(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_serializes_with_snake_case_tags() {
        let alert = Alert {
            id: "alert_1".to_string(),
            alert_type: AlertType::HabitatDegradation,
            severity: Severity::Critical,
            location: Location::new(26.2006, 92.9376, "Kaziranga"),
            timestamp: Utc::now(),
            prediction: None,
            data: serde_json::json!({"source": "satellite_imagery"}),
            status: AlertStatus::Active,
        };

        let value = serde_json::to_value(&alert).unwrap();
        assert_eq!(value["type"], "habitat_degradation");
        assert_eq!(value["severity"], "critical");
        assert_eq!(value["status"], "active");
        assert!(value.get("prediction").is_none());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Medium > Severity::Low);
    }
}
