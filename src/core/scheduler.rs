// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Task scheduler for periodic producers

use std::panic::AssertUnwindSafe;
use std::time::Duration;
use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Unit of work run once per period
#[async_trait]
pub trait PeriodicTask: Send {
    fn name(&self) -> &str;

    async fn tick(&mut self) -> anyhow::Result<()>;
}

/// Runs periodic tasks until shutdown; a failing or panicking tick is
/// logged and the task keeps its schedule
pub struct Scheduler {
    shutdown_tx: broadcast::Sender<()>,
    handles: Mutex<Vec<(String, JoinHandle<()>)>>,
}

impl Scheduler {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            shutdown_tx,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn `task` on the runtime, ticking every `period`
    pub fn spawn(&self, mut task: Box<dyn PeriodicTask>, period: Duration) {
        let name = task.name().to_string();
        let mut shutdown = self.shutdown_tx.subscribe();
        let period = period.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown.recv() => break,
                    _ = ticker.tick() => {
                        match AssertUnwindSafe(task.tick()).catch_unwind().await {
                            Ok(Ok(())) => {}
                            Ok(Err(e)) => warn!("Task '{}' tick failed: {:#}", task.name(), e),
                            Err(_) => error!("Task '{}' panicked during tick", task.name()),
                        }
                    }
                }
            }
            debug!("Task '{}' stopped", task.name());
        });

        debug!("Scheduled task '{}' with interval {:?}", name, period);
        self.handles.lock().push((name, handle));
    }

    pub fn task_count(&self) -> usize {
        self.handles.lock().len()
    }

    /// Signal every task and wait for them to finish
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
        let handles: Vec<_> = self.handles.lock().drain(..).collect();

        for (name, handle) in handles {
            if let Err(e) = handle.await {
                warn!("Task '{}' did not stop cleanly: {}", name, e);
            }
        }
        info!("Scheduler stopped");
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
