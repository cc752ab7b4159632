//! Travel Monitor CLI
//!
//! Usage:
//!   travel-monitor                          # hourly, global, with activities
//!   travel-monitor -r north-america         # scope the city list to a region
//!   travel-monitor -c monitor.yaml          # load settings from YAML
//!   travel-monitor --once                   # single tick, then exit
//!   travel-monitor --hours 24               # stop automatically after 24 hours
//!
//! Requires OPENAI_API_KEY and WEATHER_API_KEY in the environment.

use anyhow::Context;
use argh::FromArgs;
use std::time::Duration;
use tokio::sync::watch;
use travel_monitor::{Credentials, MonitorConfig, Region, Scheduler, TravelMonitor};

/// Hourly travel destination monitor driven by live weather
#[derive(FromArgs)]
struct Args {
    /// path to a YAML configuration file (optional, defaults otherwise)
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// region to scope the city list to: global, europe, asia, north-america,
    /// south-america, africa, oceania, middle-east
    #[argh(option, short = 'r')]
    region: Option<String>,

    /// skip the activity suggestions step
    #[argh(switch)]
    no_activities: bool,

    /// run a single tick and exit
    #[argh(switch)]
    once: bool,

    /// stop monitoring after this many hours
    #[argh(option)]
    hours: Option<u64>,
}

fn load_config(args: &Args) -> anyhow::Result<MonitorConfig> {
    let mut config = match &args.config {
        Some(path) => MonitorConfig::from_file(path)
            .with_context(|| format!("failed to load config from '{}'", path))?,
        None => MonitorConfig::default(),
    };

    if let Some(region) = &args.region {
        config.region = region
            .parse::<Region>()
            .map_err(travel_monitor::ConfigError::from)?;
    }
    if args.no_activities {
        config.include_activities = false;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let config = load_config(&args)?;
    let credentials = Credentials::from_env().context("missing API credentials")?;

    let monitor = TravelMonitor::from_config(&config, &credentials)?;
    let mut scheduler = Scheduler::new(monitor, &config.schedule)?;

    if args.once {
        scheduler.run_once().await;
        return Ok(());
    }

    // Create shutdown channel
    let (shutdown_tx, mut shutdown_rx) = watch::channel(());
    ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, shutting down gracefully...");
        let _ = shutdown_tx.send(());
    })
    .context("failed to set Ctrl+C handler")?;

    log::info!(
        "Starting hourly travel monitoring (region: {}, model: {})",
        config.region,
        config.model
    );
    scheduler.start().await;

    match args.hours {
        Some(hours) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(hours.saturating_mul(3600))) => {
                    log::info!("Monitoring stopped after {} hours", hours);
                }
                _ = shutdown_rx.changed() => {}
            }
        }
        None => {
            let _ = shutdown_rx.changed().await;
        }
    }

    scheduler.stop_and_wait().await;
    Ok(())
}
