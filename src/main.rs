// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! VanRakshak - Forest Threat Detection & Predictive Alerting
//!
//! Headless monitoring daemon: runs the sensor generators, acoustic
//! matching and risk prediction until Ctrl+C or a fixed duration.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use std::path::PathBuf;
use std::time::Duration;

use vanrakshak::{Config, Engine, Severity, NAME, VERSION};

/// VanRakshak - Forest Threat Detection & Predictive Alerting
#[derive(Parser, Debug)]
#[command(name = "vanrakshak")]
#[command(author = "VanRakshak Project")]
#[command(version = VERSION)]
#[command(about = "Real-time wildlife threat detection and predictive alerting")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Demo mode with simulated sensors
    #[arg(long)]
    demo: bool,

    /// Seed for the simulated sensors
    #[arg(long)]
    seed: Option<u64>,

    /// Generator and prediction tick in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Stop after this many seconds instead of waiting for Ctrl+C
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Print the final alert list as JSON on exit
    #[arg(long)]
    dump: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🐅 {} v{} - Forest Threat Detection & Predictive Alerting", NAME, VERSION);

    // Load or create configuration
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    // Override with command line args
    if args.demo {
        config.monitoring.demo_mode = true;
    }
    if args.seed.is_some() {
        config.monitoring.seed = args.seed;
    }
    if let Some(ms) = args.interval_ms {
        config.monitoring.generator_interval_ms = ms;
        config.monitoring.prediction_interval_ms = ms;
    }

    info!("Configuration loaded from {:?}", config_path);
    info!("Demo mode: {}", config.monitoring.demo_mode);
    if !config.monitoring.demo_mode {
        warn!("No sensor feeds configured outside demo mode; only risk prediction will run");
    }

    run_headless(config, args.duration_secs, args.dump).await
}

/// Run the engine until shutdown
async fn run_headless(config: Config, duration_secs: Option<u64>, dump: bool) -> Result<()> {
    let mut engine = Engine::new(config)?;

    let _subscription = engine.subscribe(|alerts| {
        if let Some(latest) = alerts.first() {
            if latest.severity >= Severity::High {
                warn!(
                    "[{:?}] {} at {} ({})",
                    latest.severity,
                    latest.alert_type.as_str(),
                    latest.location.region,
                    latest.id
                );
            }
        }
    });

    engine.start().await?;

    info!("🚀 VanRakshak monitoring");
    match duration_secs {
        Some(secs) => {
            info!("   Running for {}s", secs);
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }
        None => {
            info!("   Press Ctrl+C to shutdown");
            tokio::signal::ctrl_c().await?;
            info!("Shutdown signal received, cleaning up...");
        }
    }

    engine.shutdown().await?;

    let stats = engine.get_alert_stats();
    let model = engine.get_prediction_model();
    info!(
        "Alerts: {} retained, {} critical, {} active",
        stats.total, stats.critical, stats.active
    );
    info!(
        "Risk: poaching {:.2}, habitat {:.2}, wildlife {:.2}, environmental {:.2}",
        model.poaching_risk, model.habitat_degradation, model.wildlife_stress, model.environmental_threats
    );
    for health in engine.get_generator_health() {
        info!(
            "   {}: {} ticks, {} events, {} errors",
            health.generator_id, health.ticks, health.events, health.error_count
        );
    }

    if dump {
        println!("{}", serde_json::to_string_pretty(&engine.get_alerts())?);
    }

    info!("VanRakshak shutdown complete");
    Ok(())
}
