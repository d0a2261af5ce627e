// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Satellite imagery generator - deforestation, water and vegetation change detection

use serde::{Deserialize, Serialize};

use super::{RuleTable, SensorEventGenerator, SensorKind, SensorSource};
use crate::alerts::{AlertType, CandidateEvent, Location, Severity};

/// Per-region image analysis results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub deforestation_rate: f64,
    /// Water level, percent of seasonal baseline
    pub water_level: f64,
    /// Vegetation health index (0-100)
    pub vegetation_health: f64,
    pub human_encroachment: f64,
}

/// Satellite rule thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SatelliteRules {
    pub deforestation_critical: f64,
    pub deforestation_high: f64,
    pub vegetation_health: f64,
    pub drought_water_level: f64,
    pub drought_vegetation_health: f64,
}

impl Default for SatelliteRules {
    fn default() -> Self {
        Self {
            deforestation_critical: 8.0,
            deforestation_high: 7.0,
            vegetation_health: 70.0,
            drought_water_level: 80.0,
            drought_vegetation_health: 75.0,
        }
    }
}

impl RuleTable<ImageAnalysis> for SatelliteRules {
    fn evaluate(&self, location: &Location, a: &ImageAnalysis) -> Vec<CandidateEvent> {
        let mut events = Vec::new();
        let source = SensorKind::Satellite.source_tag();

        if a.deforestation_rate > self.deforestation_high || a.vegetation_health < self.vegetation_health {
            let severity = if a.deforestation_rate > self.deforestation_critical {
                Severity::Critical
            } else {
                Severity::High
            };
            events.push(CandidateEvent::new(
                AlertType::HabitatDegradation,
                severity,
                location,
                serde_json::json!({
                    "source": source,
                    "analysis": a,
                    "change_detection": "rapid_deforestation",
                }),
            ));
        }

        if a.water_level < self.drought_water_level && a.vegetation_health < self.drought_vegetation_health {
            events.push(CandidateEvent::new(
                AlertType::Environmental,
                Severity::Medium,
                location,
                serde_json::json!({
                    "source": source,
                    "threat_type": "drought_stress",
                    "analysis": a,
                }),
            ));
        }

        events
    }
}

/// Regions covered by default
pub fn satellite_regions() -> Vec<Location> {
    vec![
        Location::new(26.2006, 92.9376, "Kaziranga"),
        Location::new(27.5000, 77.5000, "Bharatpur"),
        Location::new(15.3000, 75.0000, "Western Ghats"),
    ]
}

pub type SatelliteGenerator = SensorEventGenerator<ImageAnalysis, SatelliteRules>;

pub fn satellite_generator(source: Box<dyn SensorSource<ImageAnalysis>>, rules: SatelliteRules) -> SatelliteGenerator {
    SensorEventGenerator::new(SensorKind::Satellite, satellite_regions(), source, rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> ImageAnalysis {
        ImageAnalysis {
            deforestation_rate: 1.0,
            water_level: 95.0,
            vegetation_health: 90.0,
            human_encroachment: 2.0,
        }
    }

    #[test]
    fn test_deforestation_grades() {
        let rules = SatelliteRules::default();
        let region = Location::new(26.2006, 92.9376, "Kaziranga");

        assert!(rules.evaluate(&region, &healthy()).is_empty());

        let severe = ImageAnalysis { deforestation_rate: 8.5, ..healthy() };
        assert_eq!(rules.evaluate(&region, &severe)[0].severity, Severity::Critical);

        let moderate = ImageAnalysis { deforestation_rate: 7.5, ..healthy() };
        assert_eq!(rules.evaluate(&region, &moderate)[0].severity, Severity::High);

        let sparse = ImageAnalysis { vegetation_health: 65.0, ..healthy() };
        let events = rules.evaluate(&region, &sparse);
        assert_eq!(events[0].alert_type, AlertType::HabitatDegradation);
        assert_eq!(events[0].severity, Severity::High);
    }

    #[test]
    fn test_drought_stress() {
        let rules = SatelliteRules::default();
        let region = Location::new(15.3, 75.0, "Western Ghats");
        let dry = ImageAnalysis { water_level: 75.0, vegetation_health: 72.0, ..healthy() };

        let events = rules.evaluate(&region, &dry);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].alert_type, AlertType::Environmental);
        assert_eq!(events[0].severity, Severity::Medium);
        assert_eq!(events[0].data["threat_type"], "drought_stress");
    }
}
