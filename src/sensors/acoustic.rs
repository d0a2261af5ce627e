// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Acoustic generator - gunshot, chainsaw and distress indicators from forest microphones

use serde::{Deserialize, Serialize};

use super::{RuleTable, SensorEventGenerator, SensorKind, SensorSource};
use crate::alerts::{AlertType, CandidateEvent, Location, Severity};

/// Composite indicators derived from a microphone station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcousticSignature {
    pub gunshots: f64,
    pub chainsaws: f64,
    pub vehicles: f64,
    pub animal_distress: f64,
    pub human_activity: f64,
}

/// Acoustic rule thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcousticRules {
    pub gunshot_critical: f64,
    pub gunshot_high: f64,
    pub animal_distress: f64,
    pub chainsaw: f64,
}

impl Default for AcousticRules {
    fn default() -> Self {
        Self {
            gunshot_critical: 8.0,
            gunshot_high: 7.0,
            animal_distress: 6.0,
            chainsaw: 3.0,
        }
    }
}

impl RuleTable<AcousticSignature> for AcousticRules {
    fn evaluate(&self, location: &Location, s: &AcousticSignature) -> Vec<CandidateEvent> {
        let mut events = Vec::new();
        let source = SensorKind::Acoustic.source_tag();

        let gunshot = s.gunshots > self.gunshot_high;
        let distress = s.animal_distress > self.animal_distress;
        if gunshot || distress {
            let severity = if s.gunshots > self.gunshot_critical {
                Severity::Critical
            } else {
                Severity::High
            };

            let mut indicators = Vec::new();
            if gunshot {
                indicators.push("gunshot_detected");
            }
            if distress {
                indicators.push("animal_distress");
            }

            events.push(CandidateEvent::new(
                AlertType::Poaching,
                severity,
                location,
                serde_json::json!({
                    "source": source,
                    "signatures": s,
                    "threat_indicators": indicators,
                }),
            ));
        }

        if s.chainsaws > self.chainsaw {
            events.push(CandidateEvent::new(
                AlertType::HabitatDegradation,
                Severity::High,
                location,
                serde_json::json!({
                    "source": source,
                    "signatures": s,
                    "threat_indicators": ["illegal_logging"],
                }),
            ));
        }

        events
    }
}

/// Microphone stations monitored by default
pub fn acoustic_stations() -> Vec<Location> {
    vec![
        Location::new(28.7041, 77.1025, "Delhi Ridge"),
        Location::new(26.9124, 75.7873, "Ranthambore"),
        Location::new(22.7196, 75.8577, "Bandhavgarh"),
    ]
}

pub type AcousticGenerator = SensorEventGenerator<AcousticSignature, AcousticRules>;

pub fn acoustic_generator(source: Box<dyn SensorSource<AcousticSignature>>, rules: AcousticRules) -> AcousticGenerator {
    SensorEventGenerator::new(SensorKind::Acoustic, acoustic_stations(), source, rules)
}
