// Main entry point - Dependency injection and tick scheduler
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use air_quality_monitor::application::engine::{
    Engine, EngineSettings, EngineState, SharedEngine, shared,
};
use air_quality_monitor::domain::pollutant::Pollutant;
use air_quality_monitor::infrastructure::config::load_monitor_config;
use air_quality_monitor::infrastructure::simulated_source::SimulatedSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let monitor_config = load_monitor_config()?;

    // Create reading source (infrastructure layer)
    let source = Arc::new(SimulatedSource::new(monitor_config.simulation.clone()));

    // Create engine (application layer)
    let mut engine = Engine::new(
        source,
        EngineSettings {
            station: monitor_config.station.clone(),
            history_capacity: monitor_config.history_capacity,
            source_timeout: monitor_config.source_timeout(),
        },
    );
    if monitor_config.forecast_on_start {
        engine.enable_forecasting();
    }

    let mut states = engine.subscribe();
    let engine = shared(engine);

    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            log_state(&state);
        }
    });

    tracing::info!(
        "Starting air quality monitor for {} (every {}s, keeping {} readings)",
        monitor_config.station,
        monitor_config.tick_interval_secs,
        monitor_config.history_capacity
    );
    let scheduler = tokio::spawn(run_scheduler(engine, monitor_config.tick_interval()));

    tokio::signal::ctrl_c().await?;
    scheduler.abort();
    tracing::info!("Shutting down");

    Ok(())
}

/// Drive one tick per period. A slow tick delays the next one instead of
/// letting two overlap.
async fn run_scheduler(engine: SharedEngine, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let result = engine.lock().await.tick().await;
        if let Err(e) = result {
            tracing::warn!("Tick failed, history left unchanged: {}", e);
        }
    }
}

fn log_state(state: &EngineState) {
    let Some(latest) = state.latest else {
        return;
    };

    for pollutant in Pollutant::ALL {
        let status = state
            .classifications
            .get(&pollutant)
            .map(|c| c.label)
            .unwrap_or_default();
        let projection = state.forecast.values(pollutant);

        tracing::info!(
            "[{}] {} = {} {} {} {}",
            state.station,
            pollutant,
            latest.value(pollutant),
            pollutant.unit(),
            status,
            if projection.is_empty() {
                String::new()
            } else {
                format!("forecast {:.1?}", projection)
            }
        );
    }

    match serde_json::to_string(state) {
        Ok(json) => tracing::debug!("State: {}", json),
        Err(e) => tracing::warn!("Could not serialise state: {}", e),
    }
}
