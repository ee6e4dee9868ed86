// History store - bounded, aligned multi-series buffer
use super::pollutant::Pollutant;
use super::reading::Reading;
use super::timestamp::Timestamp;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

pub const DEFAULT_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    timestamp: Timestamp,
    reading: Reading,
}

/// One record per tick, so every pollutant series and the timestamp axis share
/// a length by construction.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: VecDeque<Entry>,
    capacity: usize,
    position: u64,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A zero capacity is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            position: 0,
        }
    }

    pub fn append(&mut self, reading: Reading, timestamp: Timestamp) {
        self.entries.push_back(Entry { timestamp, reading });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.position += 1;
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        let timestamps = self.entries.iter().map(|e| e.timestamp).collect();
        let series = Pollutant::ALL
            .into_iter()
            .map(|p| (p, self.entries.iter().map(|e| e.reading.value(p)).collect()))
            .collect();

        HistorySnapshot {
            timestamps,
            series,
            position: self.position,
        }
    }

    pub fn latest(&self) -> Option<(Timestamp, Reading)> {
        self.entries.back().map(|e| (e.timestamp, e.reading))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of appends, including evicted ones.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only copy of the store at one instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HistorySnapshot {
    pub timestamps: Vec<Timestamp>,
    pub series: BTreeMap<Pollutant, Vec<f64>>,
    pub position: u64,
}

impl HistorySnapshot {
    pub fn values(&self, pollutant: Pollutant) -> &[f64] {
        self.series
            .get(&pollutant)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.timestamps.last().copied()
    }
}
