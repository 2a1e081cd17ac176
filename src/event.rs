use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a [`HistoricalEvent`]. Ids are positive and unique within an
/// [`crate::EventStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u32);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geographic coordinate in degrees.
///
/// This is the only coordinate representation used inside the crate. The
/// `[longitude, latitude]` ordering required by GeoJSON is produced at the
/// projection boundary, see [`Position::to_lng_lat`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn from_lng_lat([longitude, latitude]: [f64; 2]) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    History,
    Culture,
    Science,
    Politics,
    Art,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::History,
        Category::Culture,
        Category::Science,
        Category::Politics,
        Category::Art,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::History => "History",
            Category::Culture => "Culture",
            Category::Science => "Science",
            Category::Politics => "Politics",
            Category::Art => "Art",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single point record shown on the map. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub position: Position,
    pub category: Category,
}
