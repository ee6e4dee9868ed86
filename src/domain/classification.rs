// Classification domain model - regulatory tiers per pollutant
use super::pollutant::Pollutant;
use serde::Serialize;

/// Severity tier, ordered from cleanest to most polluted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Tier {
    /// No threshold table exists for the pollutant.
    Unclassified,
    Excellent,
    Good,
    LightlyPolluted,
    HeavilyPolluted,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Unclassified => "",
            Tier::Excellent => "优",
            Tier::Good => "良",
            Tier::LightlyPolluted => "轻度污染",
            Tier::HeavilyPolluted => "重度污染",
        }
    }

    /// Display colour used when rendering the status next to a value.
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Unclassified => "black",
            Tier::Excellent => "green",
            Tier::Good => "blue",
            Tier::LightlyPolluted => "orange",
            Tier::HeavilyPolluted => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub label: &'static str,
    pub tier: Tier,
    pub color: &'static str,
}

impl Classification {
    pub fn new(tier: Tier) -> Self {
        Self {
            label: tier.label(),
            tier,
            color: tier.color(),
        }
    }
}

/// Inclusive upper bounds for Excellent, Good and LightlyPolluted.
/// Anything above the last bound is HeavilyPolluted.
fn thresholds(pollutant: Pollutant) -> Option<[f64; 3]> {
    match pollutant {
        Pollutant::Pm25 => Some([35.0, 75.0, 115.0]),
        Pollutant::Pm10 => Some([50.0, 150.0, 250.0]),
        Pollutant::Co2 | Pollutant::So2 => None,
    }
}

/// Classify a single concentration. Total over f64: negative and non-finite
/// values land in the highest tier.
pub fn classify(pollutant: Pollutant, value: f64) -> Classification {
    let Some([excellent, good, light]) = thresholds(pollutant) else {
        return Classification::new(Tier::Unclassified);
    };

    let tier = if !value.is_finite() || value < 0.0 {
        Tier::HeavilyPolluted
    } else if value <= excellent {
        Tier::Excellent
    } else if value <= good {
        Tier::Good
    } else if value <= light {
        Tier::LightlyPolluted
    } else {
        Tier::HeavilyPolluted
    };

    Classification::new(tier)
}
