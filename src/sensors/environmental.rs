// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Environmental generator - temperature and air quality from weather stations

use serde::{Deserialize, Serialize};

use super::{RuleTable, SensorEventGenerator, SensorKind, SensorSource};
use crate::alerts::{AlertType, CandidateEvent, Location, Severity};

/// Weather station telemetry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalMeasurements {
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    pub air_quality_index: f64,
    /// dB
    pub noise_level: f64,
    pub human_activity_index: f64,
}

/// Environmental rule thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentalRules {
    pub air_quality_index: f64,
    pub temperature: f64,
}

impl Default for EnvironmentalRules {
    fn default() -> Self {
        Self {
            air_quality_index: 200.0,
            temperature: 40.0,
        }
    }
}

impl RuleTable<EnvironmentalMeasurements> for EnvironmentalRules {
    fn evaluate(&self, location: &Location, m: &EnvironmentalMeasurements) -> Vec<CandidateEvent> {
        if m.air_quality_index > self.air_quality_index || m.temperature > self.temperature {
            vec![CandidateEvent::new(
                AlertType::Environmental,
                Severity::Medium,
                location,
                serde_json::json!({
                    "source": SensorKind::Environmental.source_tag(),
                    "measurements": m,
                    "threat_type": "environmental_stress",
                }),
            )]
        } else {
            Vec::new()
        }
    }
}

/// Weather stations polled by default
pub fn weather_stations() -> Vec<Location> {
    vec![
        Location::new(28.7041, 77.1025, "Delhi NCR"),
        Location::new(19.0760, 72.8777, "Mumbai"),
        Location::new(13.0827, 80.2707, "Chennai"),
    ]
}

pub type EnvironmentalGenerator = SensorEventGenerator<EnvironmentalMeasurements, EnvironmentalRules>;

pub fn environmental_generator(
    source: Box<dyn SensorSource<EnvironmentalMeasurements>>,
    rules: EnvironmentalRules,
) -> EnvironmentalGenerator {
    SensorEventGenerator::new(SensorKind::Environmental, weather_stations(), source, rules)
}
