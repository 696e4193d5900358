//! Bounded record of player positions, one entry per tick

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::GridPos;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryBuffer {
    entries: VecDeque<GridPos>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Capacity needed to seed `echo_limit` echoes of `echo_delay` cells, plus slack
    pub fn capacity_for(echo_delay: usize, echo_limit: usize) -> usize {
        echo_delay * echo_limit + 60
    }

    pub fn push(&mut self, p: GridPos) {
        self.entries.push_back(p);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
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

    /// The most recent `n` entries, oldest first. None if fewer are recorded.
    pub fn recent(&self, n: usize) -> Option<Vec<GridPos>> {
        if n > self.entries.len() {
            return None;
        }
        Some(self.entries.iter().skip(self.entries.len() - n).copied().collect())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
