use crate::domain::history::DEFAULT_CAPACITY;
use crate::domain::pollutant::Pollutant;
use anyhow::Context;
use config::{Config, Environment, File, Source};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("history_capacity must be at least 1")]
    ZeroCapacity,

    #[error("tick_interval_secs must be at least 1")]
    ZeroTickInterval,

    #[error("source_timeout_ms must be at least 1")]
    ZeroSourceTimeout,

    #[error("simulation range for {0} is invalid: min {1} > max {2}")]
    InvertedRange(Pollutant, u32, u32),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MonitorConfig {
    #[serde(default = "default_station")]
    pub station: String,
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default)]
    pub forecast_on_start: bool,
    #[serde(default = "default_source_timeout_ms")]
    pub source_timeout_ms: u64,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct RangeConfig {
    pub min: u32,
    pub max: u32,
}

impl RangeConfig {
    const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Inclusive integer ranges the simulated sensor draws from.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SimulationConfig {
    #[serde(default = "default_pm25")]
    pub pm25: RangeConfig,
    #[serde(default = "default_pm10")]
    pub pm10: RangeConfig,
    #[serde(default = "default_co2")]
    pub co2: RangeConfig,
    #[serde(default = "default_so2")]
    pub so2: RangeConfig,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn range(&self, pollutant: Pollutant) -> RangeConfig {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::Co2 => self.co2,
            Pollutant::So2 => self.so2,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pm25: default_pm25(),
            pm10: default_pm10(),
            co2: default_co2(),
            so2: default_so2(),
            seed: None,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            station: default_station(),
            tick_interval_secs: default_tick_interval_secs(),
            history_capacity: default_history_capacity(),
            forecast_on_start: false,
            source_timeout_ms: default_source_timeout_ms(),
            simulation: SimulationConfig::default(),
        }
    }
}

fn default_station() -> String {
    "北京".to_string()
}

fn default_tick_interval_secs() -> u64 {
    5
}

fn default_history_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_source_timeout_ms() -> u64 {
    1000
}

fn default_pm25() -> RangeConfig {
    RangeConfig::new(20, 200)
}

fn default_pm10() -> RangeConfig {
    RangeConfig::new(30, 300)
}

fn default_co2() -> RangeConfig {
    RangeConfig::new(400, 2000)
}

fn default_so2() -> RangeConfig {
    RangeConfig::new(5, 150)
}

impl MonitorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.tick_interval_secs == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.source_timeout_ms == 0 {
            return Err(ConfigError::ZeroSourceTimeout);
        }
        for pollutant in Pollutant::ALL {
            let range = self.simulation.range(pollutant);
            if range.min > range.max {
                return Err(ConfigError::InvertedRange(pollutant, range.min, range.max));
            }
        }
        Ok(())
    }
}

const CONFIG_FILE: &str = "config/monitor";
const ENV_PREFIX: &str = "AIR_MONITOR";

/// Load `config/monitor.{toml,yaml,json}` if present, then `AIR_MONITOR__*`
/// environment overrides (e.g. `AIR_MONITOR__TICK_INTERVAL_SECS=2`).
pub fn load_monitor_config() -> anyhow::Result<MonitorConfig> {
    load(File::with_name(CONFIG_FILE).required(false), environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn load<F>(file: F, environment: Environment) -> anyhow::Result<MonitorConfig>
where
    F: Source + Send + Sync + 'static,
{
    let settings = Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()
        .with_context(|| format!("loading {}", CONFIG_FILE))?;

    let monitor: MonitorConfig = settings
        .try_deserialize()
        .context("deserializing monitor configuration")?;
    monitor.validate()?;
    Ok(monitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{FileFormat, Map};

    fn env_vars(vars: &[(&str, &str)]) -> Environment {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(vars))
    }

    fn from_sources(toml: &str, vars: &[(&str, &str)]) -> anyhow::Result<MonitorConfig> {
        load(File::from_str(toml, FileFormat::Toml), env_vars(vars))
    }

    fn from_toml(toml: &str) -> anyhow::Result<MonitorConfig> {
        from_sources(toml, &[])
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let monitor = from_toml("").unwrap();
        assert_eq!(monitor, MonitorConfig::default());
        assert_eq!(monitor.tick_interval(), Duration::from_secs(5));
        assert_eq!(monitor.history_capacity, 20);
        let co2 = monitor.simulation.range(Pollutant::Co2);
        assert_eq!(co2, RangeConfig::new(400, 2000));
    }

    #[test]
    fn test_overrides() {
        let monitor = from_toml(
            r#"
            station = "上海"
            tick_interval_secs = 2
            forecast_on_start = true

            [simulation]
            seed = 7

            [simulation.so2]
            min = 1
            max = 10
            "#,
        )
        .unwrap();

        assert_eq!(monitor.station, "上海");
        assert_eq!(monitor.tick_interval(), Duration::from_secs(2));
        assert!(monitor.forecast_on_start);
        assert_eq!(monitor.simulation.seed, Some(7));
        let so2 = monitor.simulation.range(Pollutant::So2);
        assert_eq!(so2, RangeConfig::new(1, 10));
        let pm25 = monitor.simulation.range(Pollutant::Pm25);
        assert_eq!(pm25, RangeConfig::new(20, 200));
    }

    #[test]
    fn test_environment_overrides_file() {
        let monitor = from_sources(
            "station = \"上海\"\ntick_interval_secs = 2\n",
            &[
                ("AIR_MONITOR__TICK_INTERVAL_SECS", "7"),
                ("AIR_MONITOR__FORECAST_ON_START", "true"),
                ("AIR_MONITOR__SIMULATION__SO2__MIN", "3"),
                ("AIR_MONITOR__SIMULATION__SO2__MAX", "9"),
                ("OTHER_APP__TICK_INTERVAL_SECS", "99"),
            ],
        )
        .unwrap();

        assert_eq!(monitor.station, "上海");
        assert_eq!(monitor.tick_interval_secs, 7);
        assert!(monitor.forecast_on_start);
        let so2 = monitor.simulation.range(Pollutant::So2);
        assert_eq!(so2, RangeConfig::new(3, 9));
    }

    #[test]
    fn test_invalid_environment_value_is_reported() {
        let vars = [("AIR_MONITOR__HISTORY_CAPACITY", "0")];
        let err = from_sources("", &vars).unwrap_err();
        assert!(err.to_string().contains("history_capacity"));

        let vars = [("AIR_MONITOR__TICK_INTERVAL_SECS", "soon")];
        let message = from_sources("", &vars).unwrap_err().to_string();
        assert!(message.contains("deserializing monitor configuration"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(from_toml("history_capacity = 0").is_err());
        assert!(from_toml("tick_interval_secs = 0").is_err());

        let mut monitor = MonitorConfig::default();
        monitor.simulation.pm10 = RangeConfig::new(300, 30);
        assert_eq!(
            monitor.validate(),
            Err(ConfigError::InvertedRange(Pollutant::Pm10, 300, 30))
        );
        monitor.simulation.pm10 = RangeConfig::new(30, 300);
        monitor.source_timeout_ms = 0;
        assert_eq!(monitor.validate(), Err(ConfigError::ZeroSourceTimeout));
    }
}
