use serde::{Deserialize, Serialize};

use crate::{EventId, Position, Viewport};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadMarkerClick {
    pub id: EventId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadClusterClick {
    pub position: Position,
    pub point_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadViewportChange {
    pub viewport: Viewport,
}

/// Interactions reported by [`crate::MapView`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    MarkerClick(PayloadMarkerClick),
    ClusterClick(PayloadClusterClick),
    ViewportChange(PayloadViewportChange),
}
