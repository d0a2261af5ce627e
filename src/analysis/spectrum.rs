// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Spectrum samples - dominant frequency peaks extracted from audio

use std::f64::consts::PI;
use chrono::{DateTime, Utc};
use rustfft::{FftPlanner, num_complex::Complex};
use serde::{Deserialize, Serialize};

/// One dominant frequency with its normalized amplitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPeak {
    /// Frequency in Hz
    pub frequency: f64,
    /// Normalized amplitude (0-1)
    pub amplitude: f64,
}

/// Timestamped set of dominant peaks above the detection threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumSample {
    pub timestamp: DateTime<Utc>,
    pub peaks: Vec<SpectrumPeak>,
    /// Sum of all analyser magnitudes the peaks were taken from
    pub total_energy: f64,
}

impl SpectrumSample {
    /// Build from already-extracted peaks. Non-finite or negative
    /// frequencies are dropped and amplitudes are clamped to [0, 1].
    pub fn new(peaks: Vec<SpectrumPeak>) -> Self {
        let peaks: Vec<SpectrumPeak> = peaks
            .into_iter()
            .filter(|p| p.frequency.is_finite() && p.frequency >= 0.0 && p.amplitude.is_finite())
            .map(|p| SpectrumPeak {
                frequency: p.frequency,
                amplitude: p.amplitude.clamp(0.0, 1.0),
            })
            .collect();
        let total_energy = peaks.iter().map(|p| p.amplitude).sum();

        Self {
            timestamp: Utc::now(),
            peaks,
            total_energy,
        }
    }

    /// Convenience constructor from `(frequency, amplitude)` pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(frequency, amplitude)| SpectrumPeak { frequency, amplitude })
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Extract peaks from byte magnitude bins as produced by an audio
    /// analyser node. Bin `i` maps to `i * sample_rate / (2 * bins.len())` Hz.
    pub fn from_magnitudes(bins: &[u8], sample_rate: f64, threshold: u8) -> Self {
        if bins.is_empty() {
            return Self::empty();
        }

        let resolution = sample_rate / (2.0 * bins.len() as f64);
        let peaks = bins
            .iter()
            .enumerate()
            .filter(|(_, &m)| m > threshold)
            .map(|(i, &m)| SpectrumPeak {
                frequency: (i as f64 * resolution).round(),
                amplitude: m as f64 / 255.0,
            })
            .collect();

        Self {
            timestamp: Utc::now(),
            peaks,
            total_energy: bins.iter().map(|&m| m as f64).sum(),
        }
    }

    /// Hann-windowed FFT of a PCM frame; keeps bins whose normalized
    /// amplitude exceeds `threshold / 255`.
    pub fn from_waveform(data: &[f64], sample_rate: f64, threshold: u8) -> Self {
        if data.len() < 4 {
            return Self::empty();
        }

        let len = data.len();
        let n = len.next_power_of_two();

        let mut buffer: Vec<Complex<f64>> = data
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let w = 0.5 * (1.0 - (2.0 * PI * i as f64 / len as f64).cos());
                Complex::new(x * w, 0.0)
            })
            .collect();
        buffer.resize(n, Complex::new(0.0, 0.0));

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        // Hann coherent gain is 0.5, so a full-scale sine peaks at len / 4
        let scale = 4.0 / len as f64;
        let freq_resolution = sample_rate / n as f64;
        let cutoff = threshold as f64 / 255.0;

        let magnitudes: Vec<f64> = buffer[0..n / 2]
            .iter()
            .map(|c| (c.norm() * scale).min(1.0))
            .collect();

        let peaks = magnitudes
            .iter()
            .enumerate()
            .filter(|(_, &m)| m > cutoff)
            .map(|(i, &m)| SpectrumPeak {
                frequency: (i as f64 * freq_resolution).round(),
                amplitude: m,
            })
            .collect();

        Self {
            timestamp: Utc::now(),
            peaks,
            total_energy: magnitudes.iter().sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// Mean peak amplitude, 0 for an empty sample
    pub fn average_amplitude(&self) -> f64 {
        if self.peaks.is_empty() {
            return 0.0;
        }
        self.peaks.iter().map(|p| p.amplitude).sum::<f64>() / self.peaks.len() as f64
    }

    pub fn contains_near(&self, frequency: f64, tolerance: f64) -> bool {
        self.peaks.iter().any(|p| (p.frequency - frequency).abs() <= tolerance)
    }
}
