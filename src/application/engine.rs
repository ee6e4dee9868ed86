// Monitoring engine - Tick orchestration, forecast mode and state publication
use crate::application::forecaster;
use crate::application::reading_source::ReadingSource;
use crate::domain::classification::{Classification, classify};
use crate::domain::forecast::ForecastSeries;
use crate::domain::history::{HistorySnapshot, HistoryStore};
use crate::domain::pollutant::Pollutant;
use crate::domain::reading::Reading;
use crate::domain::timestamp::Timestamp;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, watch};

pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("reading source failed: {0}")]
    Source(#[source] anyhow::Error),

    #[error("reading source did not answer within {0:?}")]
    SourceTimeout(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ForecastMode {
    Plain,
    Forecasting,
}

/// Everything a presentation layer needs after a tick or a mode change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineState {
    pub station: String,
    pub mode: ForecastMode,
    pub history: HistorySnapshot,
    pub latest: Option<Reading>,
    pub classifications: BTreeMap<Pollutant, Classification>,
    pub forecast: ForecastSeries,
}

pub struct EngineSettings {
    pub station: String,
    pub history_capacity: usize,
    pub source_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            station: String::new(),
            history_capacity: crate::domain::history::DEFAULT_CAPACITY,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }
}

pub struct Engine {
    source: Arc<dyn ReadingSource>,
    station: String,
    source_timeout: Duration,
    history: HistoryStore,
    forecast: ForecastSeries,
    mode: ForecastMode,
    publisher: watch::Sender<Arc<EngineState>>,
}

impl Engine {
    pub fn new(source: Arc<dyn ReadingSource>, settings: EngineSettings) -> Self {
        let history = HistoryStore::with_capacity(settings.history_capacity);
        let forecast = ForecastSeries::empty();
        let initial = EngineState {
            station: settings.station.clone(),
            mode: ForecastMode::Plain,
            history: history.snapshot(),
            latest: None,
            classifications: BTreeMap::new(),
            forecast: forecast.clone(),
        };
        let (publisher, _) = watch::channel(Arc::new(initial));

        Self {
            source,
            station: settings.station,
            source_timeout: settings.source_timeout,
            history,
            forecast,
            mode: ForecastMode::Plain,
            publisher,
        }
    }

    pub fn mode(&self) -> ForecastMode {
        self.mode
    }

    /// Receiver that always sees whole states, never a half-applied tick.
    pub fn subscribe(&self) -> watch::Receiver<Arc<EngineState>> {
        self.publisher.subscribe()
    }

    /// The most recently published state.
    pub fn state(&self) -> Arc<EngineState> {
        self.publisher.borrow().clone()
    }

    /// Poll the source once and fold the reading into history.
    /// On a source failure nothing is modified.
    pub async fn tick(&mut self) -> Result<Arc<EngineState>, EngineError> {
        let poll = self.source.next_reading();
        let reading = match tokio::time::timeout(self.source_timeout, poll).await {
            Ok(Ok(reading)) => reading,
            Ok(Err(e)) => return Err(EngineError::Source(e)),
            Err(_) => return Err(EngineError::SourceTimeout(self.source_timeout)),
        };
        self.record(reading, Timestamp::now());
        Ok(self.publish())
    }

    pub fn enable_forecasting(&mut self) -> Arc<EngineState> {
        if self.mode == ForecastMode::Plain {
            tracing::info!("Forecasting enabled for {}", self.station);
        }
        self.mode = ForecastMode::Forecasting;
        self.forecast = forecaster::forecast(&self.history.snapshot());
        self.publish()
    }

    pub fn disable_forecasting(&mut self) -> Arc<EngineState> {
        if self.mode == ForecastMode::Plain {
            return self.state();
        }
        tracing::info!("Forecasting disabled for {}", self.station);
        self.mode = ForecastMode::Plain;
        self.forecast = ForecastSeries::empty();
        self.publish()
    }

    fn record(&mut self, reading: Reading, timestamp: Timestamp) {
        self.history.append(reading, timestamp);
        if self.mode == ForecastMode::Forecasting {
            self.forecast = forecaster::forecast(&self.history.snapshot());
        }
        tracing::debug!(
            "Recorded reading #{} at {} ({} points retained)",
            self.history.position(),
            timestamp,
            self.history.len()
        );
    }

    fn publish(&self) -> Arc<EngineState> {
        let latest = self.history.latest().map(|(_, reading)| reading);
        let classifications: BTreeMap<Pollutant, Classification> = latest
            .map(|reading| reading.iter().map(|(p, v)| (p, classify(p, v))).collect())
            .unwrap_or_default();

        let state = Arc::new(EngineState {
            station: self.station.clone(),
            mode: self.mode,
            history: self.history.snapshot(),
            latest,
            classifications,
            forecast: self.forecast.clone(),
        });
        self.publisher.send_replace(state.clone());
        state
    }
}

/// Engine guarded by a single lock so concurrent callers are serialised.
pub type SharedEngine = Arc<Mutex<Engine>>;

pub fn shared(engine: Engine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}
