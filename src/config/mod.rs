// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::alerts::Location;
use crate::error::MonitorError;
use crate::sensors::{AcousticRules, CameraTrapRules, EnvironmentalRules, SatelliteRules};

/// Upper bound for the trailing alert windows (ten years)
pub const MAX_WINDOW_HOURS: i64 = 24 * 365 * 10;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Application version
    pub version: String,

    /// Log level
    pub log_level: String,

    /// Producer cadence and simulation settings
    pub monitoring: MonitoringConfig,

    /// Acoustic matching configuration
    pub acoustic: AcousticConfig,

    /// Generator rule thresholds
    pub generators: GeneratorConfig,

    /// Predictive risk configuration
    pub prediction: PredictionConfig,

    /// Alert store configuration
    pub alerts: AlertConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "VanRakshak".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            monitoring: MonitoringConfig::default(),
            acoustic: AcousticConfig::default(),
            generators: GeneratorConfig::default(),
            prediction: PredictionConfig::default(),
            alerts: AlertConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            // Create parent directories
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Reject values that would break scoring or store invariants
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(invalid(format!("{} must be within [0, 1], got {}", name, v)))
            }
        };

        unit("acoustic.acceptance_threshold", self.acoustic.acceptance_threshold)?;
        unit("acoustic.amplitude_tolerance", self.acoustic.amplitude_tolerance)?;
        unit("prediction.poaching_trigger", self.prediction.poaching_trigger)?;
        unit("prediction.habitat_trigger", self.prediction.habitat_trigger)?;
        unit("prediction.high_severity_above", self.prediction.high_severity_above)?;

        if self.alerts.capacity == 0 {
            return Err(invalid("alerts.capacity must be at least 1".to_string()));
        }
        if self.monitoring.generator_interval_ms == 0
            || self.monitoring.prediction_interval_ms == 0
            || self.monitoring.acoustic_interval_ms == 0
        {
            return Err(invalid("monitoring intervals must be non-zero".to_string()));
        }
        if self.acoustic.band_tolerance_hz < 0.0 || self.acoustic.harmonic_tolerance_hz < 0.0 {
            return Err(invalid("acoustic tolerances must be non-negative".to_string()));
        }

        let window = |name: &str, hours: i64| {
            if (1..=MAX_WINDOW_HOURS).contains(&hours) {
                Ok(())
            } else {
                Err(invalid(format!("{} must be within [1, {}], got {}", name, MAX_WINDOW_HOURS, hours)))
            }
        };
        window("alerts.stats_window_hours", self.alerts.stats_window_hours)?;
        window("prediction.activity_window_hours", self.prediction.activity_window_hours)?;
        Ok(())
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("vanrakshak"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

fn invalid(message: String) -> anyhow::Error {
    MonitorError::InvalidConfig(message).into()
}

fn window_hours(hours: i64) -> chrono::Duration {
    chrono::Duration::hours(hours.clamp(1, MAX_WINDOW_HOURS))
}

/// Producer cadence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Run simulated sensor feeds
    pub demo_mode: bool,

    /// Seed for the simulated feeds (random when absent)
    pub seed: Option<u64>,

    /// Sensor generator tick in milliseconds
    pub generator_interval_ms: u64,

    /// Risk engine tick in milliseconds
    pub prediction_interval_ms: u64,

    /// Audio capture poll in milliseconds
    pub acoustic_interval_ms: u64,

    /// Station reported on acoustic alerts
    pub acoustic_station: Location,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            demo_mode: true,
            seed: None,
            generator_interval_ms: 2000,
            prediction_interval_ms: 2000,
            acoustic_interval_ms: 1000,
            acoustic_station: Location::new(22.7196, 75.8577, "Bandhavgarh"),
        }
    }
}

impl MonitoringConfig {
    pub fn generator_interval(&self) -> Duration {
        Duration::from_millis(self.generator_interval_ms)
    }

    pub fn prediction_interval(&self) -> Duration {
        Duration::from_millis(self.prediction_interval_ms)
    }

    pub fn acoustic_interval(&self) -> Duration {
        Duration::from_millis(self.acoustic_interval_ms)
    }
}

/// Acoustic matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcousticConfig {
    /// Band hit window in Hz
    pub band_tolerance_hz: f64,

    /// Harmonic hit window in Hz
    pub harmonic_tolerance_hz: f64,

    /// Average amplitude window
    pub amplitude_tolerance: f64,

    /// Matches at or below this confidence are discarded
    pub acceptance_threshold: f64,

    /// Minimum analyser magnitude (0-255) for a dominant peak
    pub detection_threshold: u8,

    /// Capture sample rate in Hz
    pub sample_rate: f64,

    /// FFT size of the capture analyser
    pub fft_size: usize,
}

impl Default for AcousticConfig {
    fn default() -> Self {
        Self {
            band_tolerance_hz: 50.0,
            harmonic_tolerance_hz: 30.0,
            amplitude_tolerance: 0.3,
            acceptance_threshold: 0.6,
            detection_threshold: 100,
            sample_rate: 44100.0,
            fft_size: 2048,
        }
    }
}

/// Rule thresholds for each sensor generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub acoustic: AcousticRules,
    pub camera_trap: CameraTrapRules,
    pub satellite: SatelliteRules,
    pub environmental: EnvironmentalRules,
}

/// Predictive risk configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Poaching risk above which a predictive alert is raised
    pub poaching_trigger: f64,

    /// Habitat risk above which a predictive alert is raised
    pub habitat_trigger: f64,

    /// Risk above which predictive alerts are high severity
    pub high_severity_above: f64,

    /// Trailing window for recent activity, in hours
    pub activity_window_hours: i64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            poaching_trigger: 0.7,
            habitat_trigger: 0.6,
            high_severity_above: 0.8,
            activity_window_hours: 24,
        }
    }
}

impl PredictionConfig {
    /// Clamped into [1, MAX_WINDOW_HOURS] for configs that skipped `validate`
    pub fn activity_window(&self) -> chrono::Duration {
        window_hours(self.activity_window_hours)
    }
}

/// Alert store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Maximum retained alerts
    pub capacity: usize,

    /// Stats window in hours
    pub stats_window_hours: i64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            stats_window_hours: 24,
        }
    }
}

impl AlertConfig {
    pub fn stats_window(&self) -> chrono::Duration {
        window_hours(self.stats_window_hours)
    }
}
