//! Bounded, chronological buffer of temperature readings.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// One successful sensor sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub at: DateTime<Local>,
    pub celsius: f64,
}

impl Reading {
    pub fn new(at: DateTime<Local>, celsius: f64) -> Self {
        Self { at, celsius }
    }
}

/// Fixed-capacity FIFO. Iteration and snapshots are oldest-first.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<Reading>,
    capacity: usize,
}

impl HistoryBuffer {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading, dropping the oldest one when full.
    pub fn push(&mut self, reading: Reading) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(reading);
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

    pub fn latest(&self) -> Option<&Reading> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.entries.iter()
    }

    /// The `n` most recent readings, oldest-first.
    pub fn recent(&self, n: usize) -> Vec<Reading> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).copied().collect()
    }

    pub fn to_vec(&self) -> Vec<Reading> {
        self.entries.iter().copied().collect()
    }
}
