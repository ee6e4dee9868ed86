// Simulated sensor - Stand-in reading source drawing uniform integer concentrations
use crate::application::reading_source::ReadingSource;
use crate::domain::pollutant::Pollutant;
use crate::domain::reading::Reading;
use crate::infrastructure::config::SimulationConfig;
use anyhow::anyhow;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

pub struct SimulatedSource {
    ranges: SimulationConfig,
    rng: Mutex<StdRng>,
}

impl SimulatedSource {
    pub fn new(ranges: SimulationConfig) -> Self {
        let rng = match ranges.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            ranges,
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl ReadingSource for SimulatedSource {
    async fn next_reading(&self) -> anyhow::Result<Reading> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow!("simulated sensor rng poisoned"))?;

        let reading = Reading::from_fn(|pollutant: Pollutant| {
            let range = self.ranges.range(pollutant);
            rng.gen_range(range.min..=range.max) as f64
        });

        tracing::debug!("Simulated reading: {:?}", reading);
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::RangeConfig;

    #[tokio::test]
    async fn test_values_stay_within_ranges() {
        let ranges = SimulationConfig::default();
        let source = SimulatedSource::new(ranges.clone());

        for _ in 0..200 {
            let reading = source.next_reading().await.unwrap();
            for (pollutant, value) in reading.iter() {
                let range = ranges.range(pollutant);
                assert!(value >= range.min as f64 && value <= range.max as f64);
                assert_eq!(value.fract(), 0.0);
            }
        }
    }

    #[tokio::test]
    async fn test_seeded_sources_repeat() {
        let ranges = SimulationConfig {
            seed: Some(42),
            ..SimulationConfig::default()
        };
        let a = SimulatedSource::new(ranges.clone());
        let b = SimulatedSource::new(ranges);

        for _ in 0..10 {
            let left = a.next_reading().await.unwrap();
            let right = b.next_reading().await.unwrap();
            assert_eq!(left, right);
        }
    }

    #[tokio::test]
    async fn test_degenerate_range_is_constant() {
        let ranges = SimulationConfig {
            co2: RangeConfig { min: 415, max: 415 },
            ..SimulationConfig::default()
        };
        let source = SimulatedSource::new(ranges);
        let reading = source.next_reading().await.unwrap();
        assert_eq!(reading.value(Pollutant::Co2), 415.0);
    }
}
