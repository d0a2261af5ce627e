// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Audio capture boundary - analyser bins from a microphone array

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use rand::prelude::*;
use tracing::{debug, info};

use crate::analysis::PatternLibrary;
use crate::config::AcousticConfig;
use crate::error::{MonitorError, MonitorResult};

/// Platform audio device producing analyser magnitude bins
pub trait AudioCapture: Send {
    fn name(&self) -> &str;

    /// Acquire the device
    fn open(&mut self) -> MonitorResult<()>;

    /// One frame of byte magnitudes (0-255), `fft_size / 2` bins
    fn read_spectrum(&mut self) -> MonitorResult<Vec<u8>>;

    /// Release the device; must be idempotent
    fn close(&mut self);

    fn sample_rate(&self) -> f64;
}

/// Open capture device, closed again when dropped
pub struct CaptureSession {
    capture: Box<dyn AudioCapture>,
}

impl CaptureSession {
    pub fn open(mut capture: Box<dyn AudioCapture>) -> MonitorResult<Self> {
        capture.open()?;
        info!("Audio capture opened: {}", capture.name());
        Ok(Self { capture })
    }

    pub fn read_spectrum(&mut self) -> MonitorResult<Vec<u8>> {
        self.capture.read_spectrum()
    }

    pub fn sample_rate(&self) -> f64 {
        self.capture.sample_rate()
    }

    pub fn name(&self) -> &str {
        self.capture.name()
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.capture.close();
        info!("Audio capture released: {}", self.capture.name());
    }
}

/// Simulated microphone: background noise with occasional pattern calls
pub struct SimulatedCapture {
    id: String,
    rng: StdRng,
    library: Arc<PatternLibrary>,
    sample_rate: f64,
    bins: usize,
    threshold: u8,
    call_probability: f64,
    available: bool,
    open: Arc<AtomicBool>,
}

impl SimulatedCapture {
    pub fn new(id: &str, library: Arc<PatternLibrary>, config: &AcousticConfig) -> Self {
        Self {
            id: id.to_string(),
            rng: StdRng::from_entropy(),
            library,
            sample_rate: config.sample_rate,
            bins: (config.fft_size / 2).max(1),
            threshold: config.detection_threshold,
            call_probability: 0.05,
            available: true,
            open: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Chance per frame that a pattern call is injected
    pub fn with_call_probability(mut self, probability: f64) -> Self {
        self.call_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Device that refuses to open (permission denied, unplugged)
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Shared flag tracking whether the device is held
    pub fn open_flag(&self) -> Arc<AtomicBool> {
        self.open.clone()
    }

    fn inject(&mut self, frame: &mut [u8]) {
        let Some(pattern) = self.library.all().choose(&mut self.rng) else {
            return;
        };

        let resolution = self.sample_rate / (2.0 * frame.len() as f64);
        let magnitude = (pattern.avg_amplitude * 255.0)
            .max(f64::from(self.threshold) + 25.0)
            .min(255.0) as u8;

        for &frequency in pattern.frequencies.iter().chain(pattern.harmonics.iter()) {
            let bin = (frequency / resolution).round() as usize;
            if let Some(slot) = frame.get_mut(bin) {
                *slot = magnitude;
            }
        }
        debug!("{}: injected {} call", self.id, pattern.id);
    }
}

impl AudioCapture for SimulatedCapture {
    fn name(&self) -> &str {
        &self.id
    }

    fn open(&mut self) -> MonitorResult<()> {
        if !self.available {
            return Err(MonitorError::CaptureUnavailable(self.id.clone()));
        }
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn read_spectrum(&mut self) -> MonitorResult<Vec<u8>> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(MonitorError::CaptureClosed);
        }

        let noise_ceiling = self.threshold.saturating_sub(20).max(1);
        let mut frame: Vec<u8> = (0..self.bins).map(|_| self.rng.gen_range(0..noise_ceiling)).collect();

        if self.rng.gen_bool(self.call_probability) {
            self.inject(&mut frame);
        }
        Ok(frame)
    }

    fn close(&mut self) {
        self.open.store(false, Ordering::SeqCst);
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}
