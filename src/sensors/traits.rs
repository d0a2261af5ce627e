// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Sensor traits and common types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use anyhow::Result;
use tracing::warn;

use crate::alerts::{CandidateEvent, Location};

/// Sensor feeds monitored by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Acoustic,       // Forest microphone arrays
    CameraTrap,     // Camera trap inference
    Satellite,      // Satellite imagery analysis
    Environmental,  // Weather / air quality telemetry
}

impl SensorKind {
    pub fn id(&self) -> &'static str {
        match self {
            SensorKind::Acoustic => "acoustic",
            SensorKind::CameraTrap => "camera-trap",
            SensorKind::Satellite => "satellite",
            SensorKind::Environmental => "environmental",
        }
    }

    /// Source tag stamped into alert payloads
    pub fn source_tag(&self) -> &'static str {
        match self {
            SensorKind::Acoustic => "acoustic_sensor",
            SensorKind::CameraTrap => "camera_trap",
            SensorKind::Satellite => "satellite_imagery",
            SensorKind::Environmental => "environmental_sensors",
        }
    }
}

/// External feed delivering one reading of type `R` per monitored location
#[async_trait]
pub trait SensorSource<R>: Send + Sync {
    /// Feed name, used in logs
    fn name(&self) -> &str;

    /// Pull the current reading for a location
    async fn read(&mut self, location: &Location) -> Result<R>;
}

/// Threshold rules mapping a reading to candidate events
pub trait RuleTable<R>: Send + Sync {
    fn evaluate(&self, location: &Location, reading: &R) -> Vec<CandidateEvent>;
}

/// Outcome of one generator tick
#[derive(Debug, Default)]
pub struct TickReport {
    pub events: Vec<CandidateEvent>,
    /// One entry per location whose read failed
    pub failures: Vec<String>,
}

/// Periodic producer of candidate events
#[async_trait]
pub trait EventGenerator: Send {
    fn kind(&self) -> SensorKind;

    fn id(&self) -> &str {
        self.kind().id()
    }

    /// Poll every monitored location once and apply the rule table.
    /// A failed location does not discard events from the others.
    async fn tick(&mut self) -> Result<TickReport>;
}

/// Generator built from a location list, a feed and a rule table
pub struct SensorEventGenerator<R, T> {
    kind: SensorKind,
    locations: Vec<Location>,
    source: Box<dyn SensorSource<R>>,
    rules: T,
}

impl<R, T> SensorEventGenerator<R, T>
where
    R: Send + Sync + 'static,
    T: RuleTable<R> + 'static,
{
    pub fn new(kind: SensorKind, locations: Vec<Location>, source: Box<dyn SensorSource<R>>, rules: T) -> Self {
        Self {
            kind,
            locations,
            source,
            rules,
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn rules(&self) -> &T {
        &self.rules
    }
}

#[async_trait]
impl<R, T> EventGenerator for SensorEventGenerator<R, T>
where
    R: Send + Sync + 'static,
    T: RuleTable<R> + 'static,
{
    fn kind(&self) -> SensorKind {
        self.kind
    }

    async fn tick(&mut self) -> Result<TickReport> {
        let mut report = TickReport::default();
        for location in &self.locations {
            match self.source.read(location).await {
                Ok(reading) => report.events.extend(self.rules.evaluate(location, &reading)),
                Err(e) => {
                    warn!("{}: read failed for {}: {}", self.source.name(), location.region, e);
                    report.failures.push(format!("{}: {}", location.region, e));
                }
            }
        }
        Ok(report)
    }
}

/// Generator health metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorHealth {
    pub generator_id: String,
    pub kind: SensorKind,
    pub ticks: u64,
    pub events: u64,
    pub error_count: u64,
    pub last_error: Option<String>,
    pub last_tick: Option<DateTime<Utc>>,
}

impl GeneratorHealth {
    pub fn new(generator_id: &str, kind: SensorKind) -> Self {
        Self {
            generator_id: generator_id.to_string(),
            kind,
            ticks: 0,
            events: 0,
            error_count: 0,
            last_error: None,
            last_tick: None,
        }
    }
}
