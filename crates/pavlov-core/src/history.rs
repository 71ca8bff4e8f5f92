//! Append-only event history

use serde::{Deserialize, Serialize};

use crate::EventId;

/// Ordered record of every event an agent has learned from
///
/// Never truncated: it grows by one entry per learn cycle for the lifetime
/// of the agent, independent of how many entries the encoder reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryBuffer {
    events: Vec<EventId>,
}

impl HistoryBuffer {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event
    pub fn push(&mut self, event: EventId) {
        self.events.push(event);
    }

    /// The last `n` events, most recent first
    ///
    /// Missing entries are filled with `fallback`, so the window always has
    /// exactly `n` slots.
    #[must_use]
    pub fn window(&self, n: usize, fallback: EventId) -> Vec<EventId> {
        let recent = self.events.iter().rev().copied();
        recent
            .chain(std::iter::repeat(fallback))
            .take(n)
            .collect()
    }

    /// Most recent event
    #[must_use]
    pub fn last(&self) -> Option<EventId> {
        self.events.last().copied()
    }

    /// All events, oldest first
    #[must_use]
    pub fn as_slice(&self) -> &[EventId] {
        &self.events
    }

    /// Number of recorded events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromIterator<EventId> for HistoryBuffer {
    fn from_iter<I: IntoIterator<Item = EventId>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}
