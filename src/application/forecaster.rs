// Forecaster - linear trend extrapolation over the history window
use crate::domain::forecast::ForecastSeries;
use crate::domain::history::HistorySnapshot;
use crate::domain::pollutant::Pollutant;
use std::collections::BTreeMap;

/// Number of projected steps past the last historical point.
pub const HORIZON: usize = 3;

/// Shortest series that gets a projection.
pub const MIN_POINTS: usize = 3;

/// Spacing of projected timestamps.
pub const STEP_HOURS: i64 = 1;

/// Ordinary least squares line `value = slope * i + intercept` over index i.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit against points (0, v0), (1, v1), ... Returns None for fewer than two
    /// points, where the index variance is zero.
    pub fn fit(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }

        let n = values.len() as f64;
        let mean_x = (n - 1.0) / 2.0;
        let mean_y = values.iter().sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for (i, y) in values.iter().enumerate() {
            let dx = i as f64 - mean_x;
            covariance += dx * (y - mean_y);
            variance += dx * dx;
        }

        let slope = covariance / variance;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(&self, index: usize) -> f64 {
        self.slope * index as f64 + self.intercept
    }
}

/// Project the next `HORIZON` values of one series, or nothing if it is too short.
pub fn project(values: &[f64]) -> Vec<f64> {
    if values.len() < MIN_POINTS {
        return Vec::new();
    }

    match LinearFit::fit(values) {
        Some(line) => (values.len()..values.len() + HORIZON)
            .map(|i| line.predict(i))
            .collect(),
        None => Vec::new(),
    }
}

/// Forecast every pollutant from one consistent history snapshot.
pub fn forecast(history: &HistorySnapshot) -> ForecastSeries {
    let values: BTreeMap<_, _> = Pollutant::ALL
        .into_iter()
        .map(|p| (p, project(history.values(p))))
        .collect();

    let projected = values.values().any(|v| !v.is_empty());
    let timestamps = match history.last_timestamp() {
        Some(last) if projected => (1..=HORIZON as i64)
            .map(|step| last.plus_hours(step * STEP_HOURS))
            .collect(),
        _ => Vec::new(),
    };

    tracing::debug!(
        "Forecast over {} points: {} timestamps",
        history.len(),
        timestamps.len()
    );

    ForecastSeries { timestamps, values }
}
