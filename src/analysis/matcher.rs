// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Acoustic matcher - weighted band/amplitude/harmonic scoring

use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AcousticPattern, PatternLibrary, SpectrumPeak, SpectrumSample};
use crate::config::AcousticConfig;

/// Number of sample peaks kept on a match result
const MATCH_SNAPSHOT_PEAKS: usize = 5;
/// Number of peaks kept in the raw analysis summary
const SUMMARY_PEAKS: usize = 10;

/// Accepted match of a sample against one pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub pattern_id: String,
    pub confidence: f64,
    pub threat: bool,
    /// Top contributing sample peaks
    pub frequencies: Vec<SpectrumPeak>,
    pub timestamp: DateTime<Utc>,
}

/// Full matcher report for one sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumAnalysis {
    pub detected: bool,
    /// Accepted matches, best first
    pub results: Vec<MatchResult>,
    pub dominant_frequencies: Vec<SpectrumPeak>,
    pub average_amplitude: f64,
    pub total_energy: f64,
}

impl SpectrumAnalysis {
    pub fn best(&self) -> Option<&MatchResult> {
        self.results.first()
    }
}

/// Stateless matcher over an immutable pattern library
#[derive(Debug, Clone)]
pub struct AcousticMatcher {
    library: Arc<PatternLibrary>,
    config: AcousticConfig,
}

impl AcousticMatcher {
    pub fn new(library: Arc<PatternLibrary>, config: AcousticConfig) -> Self {
        Self { library, config }
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Fraction of band, amplitude and harmonic checks satisfied
    pub fn confidence(&self, sample: &SpectrumSample, pattern: &AcousticPattern) -> f64 {
        if sample.is_empty() {
            return 0.0;
        }

        let mut hits = 0usize;
        let mut checks = 0usize;

        for &band in &pattern.frequencies {
            checks += 1;
            if sample.contains_near(band, self.config.band_tolerance_hz) {
                hits += 1;
            }
        }

        checks += 1;
        if (sample.average_amplitude() - pattern.avg_amplitude).abs() <= self.config.amplitude_tolerance {
            hits += 1;
        }

        for &harmonic in &pattern.harmonics {
            checks += 1;
            if sample.contains_near(harmonic, self.config.harmonic_tolerance_hz) {
                hits += 1;
            }
        }

        (hits as f64 / checks as f64).clamp(0.0, 1.0)
    }

    /// Patterns scoring above the acceptance threshold, best first
    pub fn match_sample(&self, sample: &SpectrumSample) -> Vec<MatchResult> {
        if sample.is_empty() {
            return Vec::new();
        }

        let snapshot: Vec<SpectrumPeak> = sample.peaks.iter().take(MATCH_SNAPSHOT_PEAKS).copied().collect();

        let mut results: Vec<MatchResult> = self
            .library
            .all()
            .iter()
            .filter_map(|pattern| {
                let confidence = self.confidence(sample, pattern);
                (confidence > self.config.acceptance_threshold).then(|| MatchResult {
                    pattern_id: pattern.id.clone(),
                    confidence,
                    threat: pattern.threat,
                    frequencies: snapshot.clone(),
                    timestamp: sample.timestamp,
                })
            })
            .collect();

        results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        results
    }

    pub fn analyze(&self, sample: &SpectrumSample) -> SpectrumAnalysis {
        let results = self.match_sample(sample);

        SpectrumAnalysis {
            detected: !results.is_empty(),
            results,
            dominant_frequencies: sample.peaks.iter().take(SUMMARY_PEAKS).copied().collect(),
            average_amplitude: sample.average_amplitude(),
            total_energy: sample.total_energy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn matcher() -> AcousticMatcher {
        AcousticMatcher::new(Arc::new(PatternLibrary::builtin()), AcousticConfig::default())
    }

    #[test]
    fn test_tiger_roar_matches() {
        let matcher = matcher();
        let sample = SpectrumSample::from_pairs(&[
            (52.0, 0.6),
            (101.0, 0.65),
            (151.0, 0.55),
            (205.0, 0.6),
            (301.0, 0.6),
        ]);

        let results = matcher.match_sample(&sample);
        let best = &results[0];
        assert_eq!(best.pattern_id, "tiger");
        assert!(best.confidence >= 0.6);
        assert!((best.confidence - 1.0).abs() < 1e-12);
        assert!(!best.threat);
        assert_eq!(best.frequencies.len(), 5);

        for pair in results.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_harmonic_free_pattern_denominator() {
        let pattern = AcousticPattern::new("hum", &[60.0, 120.0], (0, 1000), 0.5, &[], false);
        let matcher = AcousticMatcher::new(Arc::new(PatternLibrary::new(vec![pattern.clone()])), AcousticConfig::default());

        // 1 band hit + amplitude hit out of 3 checks
        let sample = SpectrumSample::from_pairs(&[(61.0, 0.5)]);
        assert!((matcher.confidence(&sample, &pattern) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(matcher.match_sample(&sample).len(), 1);
    }

    #[test]
    fn test_far_sample_yields_nothing() {
        let library = PatternLibrary::new(vec![
            AcousticPattern::new("low", &[50.0, 100.0], (0, 1000), 0.9, &[150.0], false),
            AcousticPattern::new("mid", &[500.0, 700.0], (0, 1000), 0.8, &[], true),
        ]);
        let matcher = AcousticMatcher::new(Arc::new(library), AcousticConfig::default());
        let sample = SpectrumSample::from_pairs(&[(15000.0, 0.1), (18000.0, 0.2)]);

        for pattern in matcher.library().all() {
            assert_eq!(matcher.confidence(&sample, pattern), 0.0);
        }
        assert!(matcher.match_sample(&sample).is_empty());
        assert!(matches!(matcher.analyze(&sample), SpectrumAnalysis { detected: false, .. }));
    }

    #[test]
    fn test_empty_sample() {
        let matcher = matcher();
        let sample = SpectrumSample::empty();
        for pattern in matcher.library().all() {
            assert_eq!(matcher.confidence(&sample, pattern), 0.0);
        }
        let analysis = matcher.analyze(&sample);
        assert!(!analysis.detected);
        assert!(analysis.results.is_empty());
        assert_eq!(analysis.average_amplitude, 0.0);
    }

    #[test]
    fn test_confidence_always_in_unit_range() {
        let matcher = matcher();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let count = rng.gen_range(0..20);
            let pairs: Vec<(f64, f64)> = (0..count)
                .map(|_| (rng.gen_range(0.0..10000.0), rng.gen_range(0.0..1.0)))
                .collect();
            let sample = SpectrumSample::from_pairs(&pairs);

            for pattern in matcher.library().all() {
                let c = matcher.confidence(&sample, pattern);
                assert!((0.0..=1.0).contains(&c));
            }
            assert!(matcher.match_sample(&sample).iter().all(|r| r.confidence > 0.6));
        }
    }

    #[test]
    fn test_analysis_summary() {
        let matcher = matcher();
        let pairs: Vec<(f64, f64)> = (0..15).map(|i| (2000.0 + i as f64 * 1000.0, 0.7)).collect();
        let analysis = matcher.analyze(&SpectrumSample::from_pairs(&pairs));

        assert_eq!(analysis.dominant_frequencies.len(), 10);
        assert!((analysis.average_amplitude - 0.7).abs() < 1e-12);
        assert_eq!(analysis.best().map(|r| r.pattern_id.as_str()), Some("chainsaw"));
        assert!(analysis.best().unwrap().threat);
    }
}
