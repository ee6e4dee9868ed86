// Forecast domain model
use super::pollutant::Pollutant;
use super::timestamp::Timestamp;
use serde::Serialize;
use std::collections::BTreeMap;

/// Projected values per pollutant plus the shared future time axis.
/// A pollutant without enough history maps to an empty sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ForecastSeries {
    pub timestamps: Vec<Timestamp>,
    pub values: BTreeMap<Pollutant, Vec<f64>>,
}

impl ForecastSeries {
    pub fn empty() -> Self {
        Self {
            timestamps: Vec::new(),
            values: Pollutant::ALL
                .into_iter()
                .map(|p| (p, Vec::new()))
                .collect(),
        }
    }

    pub fn values(&self, pollutant: Pollutant) -> &[f64] {
        self.values
            .get(&pollutant)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when no pollutant has a projection.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_every_key() {
        let forecast = ForecastSeries::empty();
        assert!(forecast.is_empty());
        assert_eq!(forecast.values.len(), Pollutant::ALL.len());
        assert!(forecast.values(Pollutant::So2).is_empty());
    }
}
