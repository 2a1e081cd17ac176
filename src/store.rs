use std::collections::HashMap;

use crate::{EventId, HistoricalEvent};

/// Read-only, id-indexed collection of generated events.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<HistoricalEvent>,
    by_id: HashMap<EventId, usize>,
}

impl EventStore {
    /// Builds the store. If the input repeats an id only the first record with
    /// that id is kept.
    pub fn new(events: Vec<HistoricalEvent>) -> Self {
        let mut by_id = HashMap::with_capacity(events.len());
        let mut unique = Vec::with_capacity(events.len());
        for e in events {
            if by_id.contains_key(&e.id) {
                log::warn!("dropping event with duplicate id {}", e.id);
                continue;
            }
            by_id.insert(e.id, unique.len());
            unique.push(e);
        }

        Self {
            events: unique,
            by_id,
        }
    }

    pub fn get(&self, id: EventId) -> Option<&HistoricalEvent> {
        self.by_id.get(&id).map(|&idx| &self.events[idx])
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn events(&self) -> &[HistoricalEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoricalEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
