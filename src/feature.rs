//! GeoJSON projection of the event collection, the unit consumed by the map surface.

use serde::{Deserialize, Serialize};

use crate::{Category, CategoryFilter, EventId, HistoricalEvent, Position};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub properties: FeatureProperties,
    pub geometry: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub category: Category,
}

/// Point geometry. Coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Point")]
pub struct Point {
    pub coordinates: [f64; 2],
}

impl From<&HistoricalEvent> for Feature {
    fn from(event: &HistoricalEvent) -> Self {
        Self {
            properties: FeatureProperties {
                id: event.id,
                title: event.title.clone(),
                description: event.description.clone(),
                category: event.category,
            },
            geometry: Point {
                coordinates: event.position.to_lng_lat(),
            },
        }
    }
}

impl Feature {
    pub fn id(&self) -> EventId {
        self.properties.id
    }

    pub fn position(&self) -> Position {
        Position::from_lng_lat(self.geometry.coordinates)
    }
}

impl FeatureCollection {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a HistoricalEvent>) -> Self {
        Self {
            features: events.into_iter().map(Feature::from).collect(),
        }
    }

    /// Projects only the events accepted by `filter`; the rest are hidden from the map.
    pub fn from_events_filtered<'a>(
        events: impl IntoIterator<Item = &'a HistoricalEvent>,
        filter: &CategoryFilter,
    ) -> Self {
        Self::from_events(events.into_iter().filter(|e| filter.matches(e)))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
