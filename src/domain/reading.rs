// Reading domain model - one snapshot of every pollutant
use super::pollutant::Pollutant;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Concentrations captured in one poll, indexed by pollutant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    values: [f64; 4],
}

impl Reading {
    pub fn new(pm25: f64, pm10: f64, co2: f64, so2: f64) -> Self {
        Self {
            values: [pm25, pm10, co2, so2],
        }
    }

    pub fn from_fn(mut value_of: impl FnMut(Pollutant) -> f64) -> Self {
        Self {
            values: Pollutant::ALL.map(&mut value_of),
        }
    }

    pub fn value(&self, pollutant: Pollutant) -> f64 {
        self.values[Self::index(pollutant)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        Pollutant::ALL.into_iter().map(|p| (p, self.value(p)))
    }

    fn index(pollutant: Pollutant) -> usize {
        match pollutant {
            Pollutant::Pm25 => 0,
            Pollutant::Pm10 => 1,
            Pollutant::Co2 => 2,
            Pollutant::So2 => 3,
        }
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Pollutant::ALL.len()))?;
        for (pollutant, value) in self.iter() {
            map.serialize_entry(pollutant.key(), &value)?;
        }
        map.end()
    }
}
