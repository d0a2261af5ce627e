// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Sensor manager - wires event generators to the alert pipeline

use std::collections::HashMap;
use std::sync::Arc;
use anyhow::bail;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::{
    acoustic_generator, camera_trap_generator, environmental_generator, satellite_generator, EventGenerator,
    GeneratorHealth, SensorSimulator, TickReport,
};
use crate::config::GeneratorConfig;
use crate::core::{AlertPipeline, PeriodicTask};

/// Tracks generator health
pub struct SensorManager {
    health: Arc<RwLock<HashMap<String, GeneratorHealth>>>,
}

impl SensorManager {
    pub fn new() -> Self {
        Self {
            health: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The four generators backed by simulated feeds
    pub fn demo_generators(config: &GeneratorConfig, seed: Option<u64>) -> Vec<Box<dyn EventGenerator>> {
        info!("Adding demo generators...");

        let sim = |id: &str, offset: u64| match seed {
            Some(seed) => SensorSimulator::with_seed(id, seed.wrapping_add(offset)),
            None => SensorSimulator::new(id),
        };

        let mut generators: Vec<Box<dyn EventGenerator>> = Vec::with_capacity(4);
        generators.push(Box::new(acoustic_generator(Box::new(sim("acoustic-sim", 0)), config.acoustic.clone())));
        generators.push(Box::new(camera_trap_generator(
            Box::new(sim("camera-trap-sim", 1)),
            config.camera_trap.clone(),
        )));
        generators.push(Box::new(satellite_generator(Box::new(sim("satellite-sim", 2)), config.satellite.clone())));
        generators.push(Box::new(environmental_generator(
            Box::new(sim("environmental-sim", 3)),
            config.environmental.clone(),
        )));
        generators
    }

    /// Wrap a generator as a schedulable task publishing into `pipeline`
    pub fn attach(&self, generator: Box<dyn EventGenerator>, pipeline: Arc<AlertPipeline>) -> GeneratorTask {
        let id = {
            let mut health = self.health.write();
            let mut id = generator.id().to_string();
            // second generator of the same feed
            if health.contains_key(&id) {
                id = format!("{}-{}", id, health.len());
            }
            health.insert(id.clone(), GeneratorHealth::new(&id, generator.kind()));
            id
        };
        info!("Added generator: {} ({:?})", id, generator.kind());

        GeneratorTask {
            id,
            generator,
            pipeline,
            health: self.health.clone(),
        }
    }

    pub fn generator_count(&self) -> usize {
        self.health.read().len()
    }

    pub fn get_health(&self, id: &str) -> Option<GeneratorHealth> {
        self.health.read().get(id).cloned()
    }

    pub fn get_all_health(&self) -> Vec<GeneratorHealth> {
        let mut all: Vec<_> = self.health.read().values().cloned().collect();
        all.sort_by(|a, b| a.generator_id.cmp(&b.generator_id));
        all
    }
}

impl Default for SensorManager {
    fn default() -> Self {
        Self::new()
    }
}

/// One generator bound to the pipeline
pub struct GeneratorTask {
    id: String,
    generator: Box<dyn EventGenerator>,
    pipeline: Arc<AlertPipeline>,
    health: Arc<RwLock<HashMap<String, GeneratorHealth>>>,
}

#[async_trait]
impl PeriodicTask for GeneratorTask {
    fn name(&self) -> &str {
        &self.id
    }

    async fn tick(&mut self) -> anyhow::Result<()> {
        let TickReport { events, failures } = match self.generator.tick().await {
            Ok(report) => report,
            Err(e) => TickReport {
                failures: vec![e.to_string()],
                ..Default::default()
            },
        };

        {
            let mut health = self.health.write();
            if let Some(h) = health.get_mut(&self.id) {
                h.ticks += 1;
                h.last_tick = Some(Utc::now());
                h.events += events.len() as u64;
                h.error_count += failures.len() as u64;
                if let Some(last) = failures.last() {
                    h.last_error = Some(last.clone());
                }
            }
        }

        if !events.is_empty() {
            debug!("{}: {} candidate events", self.id, events.len());
            self.pipeline.publish_candidates(events);
        }
        if !failures.is_empty() {
            bail!("{} failed read(s): {}", failures.len(), failures.join("; "));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertFactory, Location};
    use crate::config::AlertConfig;
    use crate::core::NotificationBus;
    use crate::sensors::{CameraTrapDetections, CameraTrapRules, SensorSource};

    /// Reports two poachers everywhere except the listed regions
    struct FixedTrap {
        down: Vec<&'static str>,
    }

    #[async_trait]
    impl SensorSource<CameraTrapDetections> for FixedTrap {
        fn name(&self) -> &str {
            "fixed-trap"
        }

        async fn read(&mut self, location: &Location) -> anyhow::Result<CameraTrapDetections> {
            if self.down.contains(&location.region.as_str()) {
                bail!("inference service unreachable");
            }
            Ok(CameraTrapDetections { poachers: 2.0, ..Default::default() })
        }
    }

    fn pipeline() -> Arc<AlertPipeline> {
        Arc::new(AlertPipeline::new(
            AlertConfig::default(),
            AlertFactory::new(),
            Arc::new(NotificationBus::new()),
        ))
    }

    #[tokio::test]
    async fn test_tick_publishes_and_tracks_health() {
        let manager = SensorManager::new();
        let pipeline = pipeline();
        let generator = camera_trap_generator(Box::new(FixedTrap { down: vec![] }), CameraTrapRules::default());
        let mut task = manager.attach(Box::new(generator), pipeline.clone());

        task.tick().await.unwrap();

        // one poaching alert per trap site
        assert_eq!(pipeline.snapshot().len(), 3);
        let health = manager.get_health("camera-trap").unwrap();
        assert_eq!(health.ticks, 1);
        assert_eq!(health.events, 3);
        assert_eq!(health.error_count, 0);
    }

    #[tokio::test]
    async fn test_source_error_recorded() {
        let manager = SensorManager::new();
        let pipeline = pipeline();
        let trap = FixedTrap { down: vec!["Ranthambore", "Tadoba", "Kumbhalgarh"] };
        let generator = camera_trap_generator(Box::new(trap), CameraTrapRules::default());
        let mut task = manager.attach(Box::new(generator), pipeline.clone());

        assert!(task.tick().await.is_err());

        // one failure per unreachable site
        let health = manager.get_health("camera-trap").unwrap();
        assert_eq!(health.ticks, 1);
        assert_eq!(health.error_count, 3);
        assert!(health.last_error.unwrap().contains("unreachable"));
        assert!(pipeline.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_failed_site_keeps_other_events() {
        let manager = SensorManager::new();
        let pipeline = pipeline();
        let generator = camera_trap_generator(Box::new(FixedTrap { down: vec!["Tadoba"] }), CameraTrapRules::default());
        let mut task = manager.attach(Box::new(generator), pipeline.clone());

        assert!(task.tick().await.is_err());

        let regions: Vec<String> = pipeline.snapshot().into_iter().map(|a| a.location.region).collect();
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|r| r != "Tadoba"));

        let health = manager.get_health("camera-trap").unwrap();
        assert_eq!(health.events, 2);
        assert_eq!(health.error_count, 1);
        assert!(health.last_error.unwrap().starts_with("Tadoba"));
    }

    #[test]
    fn test_demo_generators_cover_all_feeds() {
        let generators = SensorManager::demo_generators(&GeneratorConfig::default(), Some(7));
        let ids: Vec<&str> = generators.iter().map(|g| g.id()).collect();
        assert_eq!(ids, vec!["acoustic", "camera-trap", "satellite", "environmental"]);
    }
}
