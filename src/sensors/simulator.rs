// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Sensor simulator for demo/testing

use async_trait::async_trait;
use anyhow::Result;
use rand::prelude::*;
use rand_distr::StandardNormal;

use super::{
    AcousticSignature, CameraTrapDetections, EnvironmentalMeasurements, ImageAnalysis, SensorSource,
};
use crate::alerts::Location;

/// Simulates the external sensor feeds with uniformly distributed readings
pub struct SensorSimulator {
    id: String,
    rng: StdRng,
    sequence: u64,
}

impl SensorSimulator {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            rng: StdRng::from_entropy(),
            sequence: 0,
        }
    }

    /// Deterministic simulator for reproducible runs
    pub fn with_seed(id: &str, seed: u64) -> Self {
        Self {
            id: id.to_string(),
            rng: StdRng::seed_from_u64(seed),
            sequence: 0,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    fn next(&mut self) {
        self.sequence += 1;
    }
}

#[async_trait]
impl SensorSource<AcousticSignature> for SensorSimulator {
    fn name(&self) -> &str {
        &self.id
    }

    async fn read(&mut self, _location: &Location) -> Result<AcousticSignature> {
        self.next();
        Ok(AcousticSignature {
            gunshots: self.rng.gen_range(0.0..10.0),
            chainsaws: self.rng.gen_range(0.0..5.0),
            vehicles: self.rng.gen_range(0.0..15.0),
            animal_distress: self.rng.gen_range(0.0..8.0),
            human_activity: self.rng.gen_range(0.0..20.0),
        })
    }
}

#[async_trait]
impl SensorSource<CameraTrapDetections> for SensorSimulator {
    fn name(&self) -> &str {
        &self.id
    }

    async fn read(&mut self, _location: &Location) -> Result<CameraTrapDetections> {
        self.next();
        Ok(CameraTrapDetections {
            species_count: self.rng.gen_range(0.0..3.0),
            poachers: self.rng.gen_range(0.0..2.0),
            vehicles: self.rng.gen_range(0.0..5.0),
            snares: self.rng.gen_range(0.0..1.0),
            unusual_activity: self.rng.gen_range(0.0..10.0),
            confidence: self.rng.gen_range(0.85..0.95),
        })
    }
}

#[async_trait]
impl SensorSource<ImageAnalysis> for SensorSimulator {
    fn name(&self) -> &str {
        &self.id
    }

    async fn read(&mut self, _location: &Location) -> Result<ImageAnalysis> {
        self.next();
        Ok(ImageAnalysis {
            deforestation_rate: self.rng.gen_range(0.0..10.0),
            water_level: self.rng.gen_range(70.0..100.0),
            vegetation_health: self.rng.gen_range(60.0..100.0),
            human_encroachment: self.rng.gen_range(0.0..15.0),
        })
    }
}

#[async_trait]
impl SensorSource<EnvironmentalMeasurements> for SensorSimulator {
    fn name(&self) -> &str {
        &self.id
    }

    async fn read(&mut self, _location: &Location) -> Result<EnvironmentalMeasurements> {
        self.next();
        // Station noise hovers around 55 dB
        let noise: f64 = 55.0 + 15.0 * self.rng.sample::<f64, _>(StandardNormal);
        Ok(EnvironmentalMeasurements {
            temperature: self.rng.gen_range(25.0..45.0),
            humidity: self.rng.gen_range(40.0..80.0),
            air_quality_index: self.rng.gen_range(0.0..300.0),
            noise_level: noise.clamp(0.0, 100.0),
            human_activity_index: self.rng.gen_range(0.0..50.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read_as<R>(sim: &mut SensorSimulator, location: &Location) -> R
    where
        SensorSimulator: SensorSource<R>,
    {
        sim.read(location).await.unwrap()
    }

    #[tokio::test]
    async fn test_readings_within_feed_ranges() {
        let mut sim = SensorSimulator::with_seed("sim", 42);
        let location = Location::new(0.0, 0.0, "Test");

        for _ in 0..200 {
            let a: AcousticSignature = read_as(&mut sim, &location).await;
            assert!((0.0..10.0).contains(&a.gunshots));
            assert!((0.0..8.0).contains(&a.animal_distress));

            let s: ImageAnalysis = read_as(&mut sim, &location).await;
            assert!((70.0..100.0).contains(&s.water_level));
            assert!((60.0..100.0).contains(&s.vegetation_health));

            let e: EnvironmentalMeasurements = read_as(&mut sim, &location).await;
            assert!((0.0..=100.0).contains(&e.noise_level));
        }
        assert_eq!(sim.sequence(), 600);
    }

    #[tokio::test]
    async fn test_seeded_simulators_agree() {
        let location = Location::new(0.0, 0.0, "Test");
        let mut a = SensorSimulator::with_seed("a", 9);
        let mut b = SensorSimulator::with_seed("b", 9);

        let ra: CameraTrapDetections = read_as(&mut a, &location).await;
        let rb: CameraTrapDetections = read_as(&mut b, &location).await;
        assert_eq!(ra, rb);
    }
}
