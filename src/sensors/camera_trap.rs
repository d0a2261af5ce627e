// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Camera trap generator - poacher, snare and species counts from trap inference

use serde::{Deserialize, Serialize};

use super::{RuleTable, SensorEventGenerator, SensorKind, SensorSource};
use crate::alerts::{AlertType, CandidateEvent, Location, Severity};

/// Per-trap detection counts from the inference collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraTrapDetections {
    /// Count of the tracked species (tigers)
    pub species_count: f64,
    pub poachers: f64,
    pub vehicles: f64,
    pub snares: f64,
    pub unusual_activity: f64,
    /// Inference confidence reported by the trap
    pub confidence: f64,
}

/// Camera trap rule thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTrapRules {
    pub poachers: f64,
    pub snares: f64,
    pub species_count: f64,
    pub tracked_species: String,
}

impl Default for CameraTrapRules {
    fn default() -> Self {
        Self {
            poachers: 1.5,
            snares: 0.7,
            species_count: 2.0,
            tracked_species: "tiger".to_string(),
        }
    }
}

impl RuleTable<CameraTrapDetections> for CameraTrapRules {
    fn evaluate(&self, location: &Location, d: &CameraTrapDetections) -> Vec<CandidateEvent> {
        let mut events = Vec::new();
        let source = SensorKind::CameraTrap.source_tag();

        if d.poachers > self.poachers || d.snares > self.snares {
            events.push(CandidateEvent::new(
                AlertType::Poaching,
                Severity::Critical,
                location,
                serde_json::json!({
                    "source": source,
                    "detections": d,
                    "confidence": d.confidence,
                }),
            ));
        }

        if d.species_count > self.species_count {
            let count = d.species_count.floor() as u32;
            events.push(CandidateEvent::new(
                AlertType::WildlifeMovement,
                Severity::Medium,
                location,
                serde_json::json!({
                    "source": source,
                    "species": self.tracked_species,
                    "count": count,
                    "behavior": "territorial_patrol",
                }),
            ));
        }

        events
    }
}

/// Trap sites monitored by default
pub fn camera_trap_sites() -> Vec<Location> {
    vec![
        Location::new(26.9124, 75.7873, "Ranthambore"),
        Location::new(21.1702, 79.0000, "Tadoba"),
        Location::new(24.4742, 73.7130, "Kumbhalgarh"),
    ]
}

pub type CameraTrapGenerator = SensorEventGenerator<CameraTrapDetections, CameraTrapRules>;

pub fn camera_trap_generator(
    source: Box<dyn SensorSource<CameraTrapDetections>>,
    rules: CameraTrapRules,
) -> CameraTrapGenerator {
    SensorEventGenerator::new(SensorKind::CameraTrap, camera_trap_sites(), source, rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snare_triggers_critical_poaching() {
        let site = Location::new(21.1702, 79.0, "Tadoba");
        let events = CameraTrapRules::default().evaluate(&site, &CameraTrapDetections { snares: 0.8, ..Default::default() });

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].alert_type, AlertType::Poaching);
        assert_eq!(events[0].severity, Severity::Critical);
    }

    #[test]
    fn test_species_movement() {
        let site = Location::new(26.9124, 75.7873, "Ranthambore");
        let detections = CameraTrapDetections { species_count: 2.6, poachers: 1.6, ..Default::default() };
        let events = CameraTrapRules::default().evaluate(&site, &detections);

        assert_eq!(events.len(), 2);
        let movement = &events[1];
        assert_eq!(movement.alert_type, AlertType::WildlifeMovement);
        assert_eq!(movement.severity, Severity::Medium);
        assert_eq!(movement.data["count"], 2);
        assert_eq!(movement.data["species"], "tiger");
    }
}
