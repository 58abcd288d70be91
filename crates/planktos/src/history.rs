//! Trajectory history of a swarm
//!
//! Every step appends the clock value and a copy of the positions taken
//! *before* the step. Entries are never modified after they are appended.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::positions::PositionStore;

/// How many entries a [`History`] keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryPolicy {
    /// Keep every entry for the lifetime of the swarm
    #[default]
    Unbounded,
    /// Keep the most recent `n` entries, dropping the oldest first
    Bounded(usize),
}

/// Parallel sequences of times and position snapshots
#[derive(Debug, Clone, Default)]
pub struct History {
    policy: HistoryPolicy,
    times: VecDeque<f64>,
    positions: VecDeque<PositionStore>,
    total_recorded: usize,
}

impl History {
    pub fn new(policy: HistoryPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Appends one entry, evicting the oldest if the policy requires it
    pub fn record(&mut self, time: f64, snapshot: PositionStore) {
        if let HistoryPolicy::Bounded(capacity) = self.policy {
            if capacity == 0 {
                self.total_recorded += 1;
                return;
            }
            while self.times.len() >= capacity {
                self.times.pop_front();
                self.positions.pop_front();
            }
        }
        self.times.push_back(time);
        self.positions.push_back(snapshot);
        self.total_recorded += 1;
    }

    pub fn policy(&self) -> HistoryPolicy {
        self.policy
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of entries ever recorded, including evicted ones
    pub fn total_recorded(&self) -> usize {
        self.total_recorded
    }

    /// Retained clock values, oldest first
    pub fn times(&self) -> &VecDeque<f64> {
        &self.times
    }

    /// Retained position snapshots, oldest first
    pub fn positions(&self) -> &VecDeque<PositionStore> {
        &self.positions
    }

    /// Entry `idx`, counting from the oldest retained one
    pub fn get(&self, idx: usize) -> Option<(f64, &PositionStore)> {
        Some((*self.times.get(idx)?, self.positions.get(idx)?))
    }

    pub fn last(&self) -> Option<(f64, &PositionStore)> {
        self.len().checked_sub(1).and_then(|idx| self.get(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &PositionStore)> {
        self.times.iter().copied().zip(self.positions.iter())
    }

    /// Drops every retained entry; `total_recorded` is kept
    pub fn clear(&mut self) {
        self.times.clear();
        self.positions.clear();
    }
}
