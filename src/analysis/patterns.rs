// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Acoustic signature catalog

use serde::{Deserialize, Serialize};

/// Reference signature for one species or threat sound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcousticPattern {
    pub id: String,
    /// Expected frequency bands in Hz
    pub frequencies: Vec<f64>,
    pub min_duration_ms: u32,
    pub max_duration_ms: u32,
    /// Average normalized amplitude (0-1)
    pub avg_amplitude: f64,
    /// Harmonic frequencies in Hz, may be empty
    pub harmonics: Vec<f64>,
    pub threat: bool,
}

impl AcousticPattern {
    pub fn new(
        id: &str,
        frequencies: &[f64],
        duration_ms: (u32, u32),
        avg_amplitude: f64,
        harmonics: &[f64],
        threat: bool,
    ) -> Self {
        Self {
            id: id.to_string(),
            frequencies: frequencies.to_vec(),
            min_duration_ms: duration_ms.0,
            max_duration_ms: duration_ms.1,
            avg_amplitude,
            harmonics: harmonics.to_vec(),
            threat,
        }
    }
}

/// Read-only table of acoustic patterns, built once at startup
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    patterns: Vec<AcousticPattern>,
}

impl PatternLibrary {
    pub fn new(patterns: Vec<AcousticPattern>) -> Self {
        Self { patterns }
    }

    /// Forest species and threat signatures shipped with the engine
    pub fn builtin() -> Self {
        Self::new(vec![
            AcousticPattern::new("tiger", &[50.0, 100.0, 150.0, 200.0], (1000, 4000), 0.6, &[100.0, 200.0, 300.0], false),
            AcousticPattern::new("elephant", &[10.0, 20.0, 30.0, 40.0], (2000, 8000), 0.8, &[20.0, 40.0, 60.0], false),
            AcousticPattern::new("leopard", &[80.0, 120.0, 160.0, 240.0], (800, 3000), 0.5, &[160.0, 320.0, 480.0], false),
            AcousticPattern::new("deer", &[300.0, 500.0, 800.0, 1200.0], (500, 2000), 0.4, &[600.0, 1200.0, 1800.0], false),
            AcousticPattern::new("bird", &[1000.0, 2000.0, 4000.0, 8000.0], (200, 1500), 0.3, &[2000.0, 4000.0, 8000.0], false),
            AcousticPattern::new("gunshot", &[500.0, 1000.0, 2000.0, 4000.0], (100, 500), 0.9, &[1000.0, 2000.0, 4000.0], true),
            AcousticPattern::new("chainsaw", &[2000.0, 3000.0, 4000.0, 5000.0], (3000, 30000), 0.7, &[4000.0, 6000.0, 8000.0], true),
        ])
    }

    pub fn all(&self) -> &[AcousticPattern] {
        &self.patterns
    }

    pub fn get(&self, id: &str) -> Option<&AcousticPattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let library = PatternLibrary::builtin();
        assert_eq!(library.len(), 7);

        let threats: Vec<_> = library.all().iter().filter(|p| p.threat).map(|p| p.id.as_str()).collect();
        assert_eq!(threats, vec!["gunshot", "chainsaw"]);

        let tiger = library.get("tiger").unwrap();
        assert_eq!(tiger.frequencies, vec![50.0, 100.0, 150.0, 200.0]);
        assert_eq!(tiger.min_duration_ms, 1000);
        assert!(library.get("wolf").is_none());
    }
}
