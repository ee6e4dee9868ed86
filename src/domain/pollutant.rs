// Pollutant domain model
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Pollutant {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "CO2")]
    Co2,
    #[serde(rename = "SO2")]
    So2,
}

impl Pollutant {
    /// All monitored pollutants, in display order.
    pub const ALL: [Pollutant; 4] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::Co2,
        Pollutant::So2,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::Co2 => "CO2",
            Pollutant::So2 => "SO2",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Pollutant::Co2 => "ppm",
            _ => "μg/m³",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Pollutant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pollutant::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("unknown pollutant key: {}", s))
    }
}
