// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Main monitoring engine - owns the alert pipeline and all producers

use std::sync::Arc;
use std::time::Instant;
use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{AlertPipeline, NotificationBus, PeriodicTask, Scheduler, Subscription, SystemState};
use crate::alerts::{Alert, AlertFactory, AlertStats, AlertStatus, Location};
use crate::analysis::{AcousticMatcher, PatternLibrary, SpectrumAnalysis, SpectrumSample};
use crate::config::Config;
use crate::prediction::{PredictionTask, PredictiveRiskEngine, RiskModel};
use crate::sensors::{AudioCapture, CaptureSession, EventGenerator, GeneratorHealth, SensorManager, SimulatedCapture};

/// Main VanRakshak engine
pub struct Engine {
    pub config: Arc<Config>,
    pipeline: Arc<AlertPipeline>,
    matcher: AcousticMatcher,
    model: Arc<RwLock<RiskModel>>,
    sensors: SensorManager,
    scheduler: Scheduler,
    pending: Vec<Box<dyn EventGenerator>>,
    capture: Option<Box<dyn AudioCapture>>,
    detections: Arc<watch::Sender<Option<Arc<SpectrumAnalysis>>>>,
    state: Arc<RwLock<SystemState>>,
    start_time: Option<Instant>,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let bus = Arc::new(NotificationBus::new());
        let pipeline = Arc::new(AlertPipeline::new(config.alerts.clone(), AlertFactory::new(), bus));
        let matcher = AcousticMatcher::new(Arc::new(PatternLibrary::builtin()), config.acoustic.clone());
        let (detections, _) = watch::channel(None);

        Ok(Self {
            config,
            pipeline,
            matcher,
            model: Arc::new(RwLock::new(RiskModel::default())),
            sensors: SensorManager::new(),
            scheduler: Scheduler::new(),
            pending: Vec::new(),
            capture: None,
            detections: Arc::new(detections),
            state: Arc::new(RwLock::new(SystemState::default())),
            start_time: None,
        })
    }

    /// Register a generator; it starts ticking on [`Engine::start`]
    pub fn add_generator(&mut self, generator: Box<dyn EventGenerator>) {
        debug!("Queued generator {}", generator.id());
        self.pending.push(generator);
    }

    /// Attach an audio capture device for acoustic matching
    pub fn set_capture(&mut self, capture: Box<dyn AudioCapture>) {
        self.capture = Some(capture);
    }

    /// Start every producer. An engine runs once; restarting after
    /// [`Engine::shutdown`] is an error.
    pub async fn start(&mut self) -> Result<()> {
        if self.state.read().running {
            bail!("Engine already running");
        }
        if self.start_time.is_some() {
            bail!("Engine has been shut down and cannot be restarted");
        }
        info!("Starting VanRakshak engine...");
        self.start_time = Some(Instant::now());

        let monitoring = &self.config.monitoring;
        if self.pending.is_empty() && monitoring.demo_mode {
            self.pending = SensorManager::demo_generators(&self.config.generators, monitoring.seed);
            if self.capture.is_none() {
                let mut capture = SimulatedCapture::new(
                    "acoustic-sim",
                    Arc::new(self.matcher.library().clone()),
                    &self.config.acoustic,
                );
                if let Some(seed) = monitoring.seed {
                    capture = capture.with_seed(seed);
                }
                self.capture = Some(Box::new(capture));
            }
        }

        let generators = std::mem::take(&mut self.pending);
        let generator_count = generators.len();
        for generator in generators {
            let task = self.sensors.attach(generator, self.pipeline.clone());
            self.scheduler.spawn(Box::new(task), monitoring.generator_interval());
        }

        let mut risk_engine = PredictiveRiskEngine::new(self.config.prediction.clone(), self.pipeline.factory().clone());
        if let Some(seed) = monitoring.seed {
            risk_engine = risk_engine.with_seed(seed);
        }
        self.scheduler.spawn(
            Box::new(PredictionTask::new(risk_engine, self.pipeline.clone(), self.model.clone())),
            monitoring.prediction_interval(),
        );

        let mut acoustic_capture = false;
        if let Some(capture) = self.capture.take() {
            match CaptureSession::open(capture) {
                Ok(session) => {
                    let task = AcousticTask {
                        session,
                        matcher: self.matcher.clone(),
                        pipeline: self.pipeline.clone(),
                        station: monitoring.acoustic_station.clone(),
                        detections: self.detections.clone(),
                        threshold: self.config.acoustic.detection_threshold,
                    };
                    self.scheduler.spawn(Box::new(task), monitoring.acoustic_interval());
                    acoustic_capture = true;
                }
                Err(e) => warn!("Acoustic monitoring disabled: {}", e),
            }
        }

        {
            let mut state = self.state.write();
            state.running = true;
            state.generators_active = generator_count;
            state.acoustic_capture = acoustic_capture;
        }

        info!(
            "VanRakshak engine started ({} generators, acoustic capture: {})",
            generator_count, acoustic_capture
        );
        Ok(())
    }

    /// Stop every producer and release the capture device
    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Stopping VanRakshak engine...");
        self.scheduler.shutdown().await;

        {
            let mut state = self.state.write();
            state.running = false;
            state.generators_active = 0;
            state.acoustic_capture = false;
        }

        info!("VanRakshak engine stopped");
        Ok(())
    }

    /// Register a snapshot callback; called immediately with the current alerts
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&[Alert]) + Send + Sync + 'static,
    {
        self.pipeline.bus().subscribe(callback)
    }

    pub fn watch(&self) -> watch::Receiver<Arc<Vec<Alert>>> {
        self.pipeline.bus().watch()
    }

    /// Latest spectrum analysis that detected at least one pattern
    pub fn watch_detections(&self) -> watch::Receiver<Option<Arc<SpectrumAnalysis>>> {
        self.detections.subscribe()
    }

    /// Retained alerts, newest first
    pub fn get_alerts(&self) -> Vec<Alert> {
        self.pipeline.snapshot()
    }

    pub fn update_alert_status(&self, id: &str, status: AlertStatus) -> bool {
        self.pipeline.update_status(id, status)
    }

    pub fn get_alert_stats(&self) -> AlertStats {
        self.pipeline.stats()
    }

    pub fn get_prediction_model(&self) -> RiskModel {
        self.model.read().clone()
    }

    pub fn get_generator_health(&self) -> Vec<GeneratorHealth> {
        self.sensors.get_all_health()
    }

    /// Match one spectrum sample and record the best match as an alert
    pub fn process_spectrum(&self, sample: &SpectrumSample) -> SpectrumAnalysis {
        record_analysis(
            &self.matcher,
            &self.pipeline,
            &self.detections,
            &self.config.monitoring.acoustic_station,
            sample,
        )
    }

    pub fn state(&self) -> SystemState {
        let mut state = self.state.read().clone();
        state.total_alerts = self.pipeline.total_alerts();
        state.subscribers = self.pipeline.bus().subscriber_count();
        state.uptime_seconds = self.uptime();
        self.pipeline.read(|store| {
            state.alerts_retained = store.len();
            state.last_alert = store.newest().map(|a| a.timestamp);
        });
        state
    }

    pub fn uptime(&self) -> u64 {
        self.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0)
    }
}

fn record_analysis(
    matcher: &AcousticMatcher,
    pipeline: &AlertPipeline,
    detections: &watch::Sender<Option<Arc<SpectrumAnalysis>>>,
    station: &Location,
    sample: &SpectrumSample,
) -> SpectrumAnalysis {
    let analysis = matcher.analyze(sample);
    if analysis.detected {
        detections.send_replace(Some(Arc::new(analysis.clone())));
    }
    if let Some(best) = analysis.best() {
        info!(
            "Acoustic match: {} ({:.0}%{})",
            best.pattern_id,
            best.confidence * 100.0,
            if best.threat { ", threat" } else { "" }
        );
        let alert = pipeline.factory().from_match(best, station);
        pipeline.publish_alerts(vec![alert]);
    }
    analysis
}

/// Polls the capture device and feeds the matcher
struct AcousticTask {
    session: CaptureSession,
    matcher: AcousticMatcher,
    pipeline: Arc<AlertPipeline>,
    station: Location,
    detections: Arc<watch::Sender<Option<Arc<SpectrumAnalysis>>>>,
    threshold: u8,
}

#[async_trait]
impl PeriodicTask for AcousticTask {
    fn name(&self) -> &str {
        "acoustic-capture"
    }

    async fn tick(&mut self) -> Result<()> {
        let bins = self.session.read_spectrum()?;
        let sample = SpectrumSample::from_magnitudes(&bins, self.session.sample_rate(), self.threshold);
        if !sample.is_empty() {
            record_analysis(&self.matcher, &self.pipeline, &self.detections, &self.station, &sample);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.monitoring.demo_mode = false;
        config
    }

    #[tokio::test]
    async fn test_process_spectrum_records_best_match() {
        let engine = Engine::new(quiet_config()).unwrap();
        let sample = SpectrumSample::from_pairs(&[
            (500.0, 0.9),
            (1000.0, 0.9),
            (2000.0, 0.9),
            (4000.0, 0.9),
        ]);

        let mut detections = engine.watch_detections();
        assert!(detections.borrow().is_none());

        let analysis = engine.process_spectrum(&sample);
        assert!(analysis.detected);

        assert!(detections.has_changed().unwrap());
        let published = detections.borrow_and_update().clone().unwrap();
        assert_eq!(published.best().map(|m| m.pattern_id.as_str()), Some("gunshot"));

        let alerts = engine.get_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].data["species"], "gunshot");
        assert_eq!(alerts[0].location.region, "Bandhavgarh");
    }

    #[tokio::test]
    async fn test_empty_spectrum_is_ignored() {
        let engine = Engine::new(quiet_config()).unwrap();
        let detections = engine.watch_detections();
        let analysis = engine.process_spectrum(&SpectrumSample::empty());

        assert!(!analysis.detected);
        assert!(engine.get_alerts().is_empty());
        assert!(!detections.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let mut engine = Engine::new(quiet_config()).unwrap();
        engine.start().await.unwrap();
        assert!(engine.state().running);
        assert!(engine.start().await.is_err());

        engine.shutdown().await.unwrap();
        assert!(!engine.state().running);
    }

    #[tokio::test]
    async fn test_restart_after_shutdown_fails() {
        let mut engine = Engine::new(quiet_config()).unwrap();
        engine.start().await.unwrap();
        engine.shutdown().await.unwrap();

        assert!(engine.start().await.is_err());
        assert!(!engine.state().running);
    }

    #[test]
    fn test_subscribe_without_runtime() {
        let engine = Engine::new(quiet_config()).unwrap();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let sink = seen.clone();
        let _sub = engine.subscribe(move |alerts| sink.lock().push(alerts.len()));
        assert_eq!(*seen.lock(), vec![0]);

        engine.process_spectrum(&SpectrumSample::from_pairs(&[
            (500.0, 0.9),
            (1000.0, 0.9),
            (2000.0, 0.9),
            (4000.0, 0.9),
        ]));
        std::thread::sleep(std::time::Duration::from_millis(100));
        assert_eq!(*seen.lock(), vec![0, 1]);
    }
}
