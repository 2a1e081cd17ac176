use rand::{seq::IndexedRandom, Rng};

use crate::{Category, EventId, EventStore, HistoricalEvent, Position};

pub const DEFAULT_EVENT_COUNT: usize = 100_000;

const TITLES: [&str; 5] = [
    "The Great Fire",
    "Invention of the Wheel",
    "First Moon Landing",
    "Fall of the Berlin Wall",
    "Discovery of Penicillin",
];

/// Produces synthetic [`HistoricalEvent`]s scattered uniformly over the globe.
///
/// Ids are sequential starting at 1. Title and category are picked uniformly
/// from fixed label sets, the description is derived from the title.
/// Coordinates ignore real geography and are rounded to 6 decimal places.
#[derive(Debug, Clone, Copy)]
pub struct EventGenerator {
    count: usize,
}

impl Default for EventGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_COUNT)
    }
}

impl EventGenerator {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Generates the collection using the thread-local rng.
    pub fn generate(&self) -> EventStore {
        self.generate_with(&mut rand::rng())
    }

    /// Generates the collection using the provided rng. Useful for seeded runs.
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> EventStore {
        let events = (1..=self.count)
            .map(|i| random_event(EventId(u32::try_from(i).unwrap_or(u32::MAX)), rng))
            .collect();

        EventStore::new(events)
    }
}

fn random_event<R: Rng>(id: EventId, rng: &mut R) -> HistoricalEvent {
    let title = TITLES.choose(rng).copied().unwrap_or(TITLES[0]);
    let category = Category::ALL
        .choose(rng)
        .copied()
        .unwrap_or(Category::History);

    let latitude = round6(rng.random_range(-90.0..=90.0));
    let longitude = round6(rng.random_range(-180.0..=180.0));

    HistoricalEvent {
        id,
        title: title.to_string(),
        description: format!("Description for {title}"),
        position: Position::new(latitude, longitude),
        category,
    }
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}
