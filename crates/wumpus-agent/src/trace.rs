use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the agent's reasoning trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThoughtEntry {
    pub turn: u64,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Bounded trace; pushing past capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct ThoughtLog {
    capacity: usize,
    entries: VecDeque<ThoughtEntry>,
}

impl ThoughtLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, turn: u64, message: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        let message = message.into();
        tracing::debug!(turn, %message, "thought");
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ThoughtEntry {
            turn,
            timestamp: Utc::now(),
            message,
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &ThoughtEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&ThoughtEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
