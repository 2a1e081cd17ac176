use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::Position;

/// Side of a Web Mercator tile in screen pixels at integer zoom levels.
pub const TILE_SIZE: f64 = 512.;
pub const MIN_ZOOM: f64 = 0.;
pub const MAX_ZOOM: f64 = 22.;
/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_129;
/// Zoom used when flying to a single event.
pub const FLY_TO_ZOOM: f64 = 15.;

const DEFAULT_POSITION: Position = Position::new(51.505, -0.09);
const DEFAULT_ZOOM: f64 = 13.;

/// Map centre and zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::centered_on(DEFAULT_POSITION, DEFAULT_ZOOM)
    }
}

impl Viewport {
    /// Creates a viewport, clamping latitude and zoom and wrapping longitude.
    pub fn new(latitude: f64, longitude: f64, zoom: f64) -> Self {
        Self {
            latitude: latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            longitude: wrap_longitude(longitude),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    pub fn centered_on(position: Position, zoom: f64) -> Self {
        Self::new(position.latitude, position.longitude, zoom)
    }

    pub fn center(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }

    /// Offset in screen pixels of `position` from the viewport centre.
    pub fn offset_of(&self, position: Position) -> [f64; 2] {
        let [cx, cy] = project(self.center(), self.zoom);
        let [x, y] = project(position, self.zoom);
        [x - cx, y - cy]
    }

    /// Geographic position under a screen offset from the viewport centre.
    pub fn position_at(&self, offset: [f64; 2]) -> Position {
        let [cx, cy] = project(self.center(), self.zoom);
        unproject([cx + offset[0], cy + offset[1]], self.zoom)
    }

    /// Moves the map content by `delta` screen pixels, as a drag does.
    pub fn panned_by(&self, delta: [f64; 2]) -> Self {
        let center = self.position_at([-delta[0], -delta[1]]);
        Self::centered_on(center, self.zoom)
    }

    /// Changes zoom by `delta` levels keeping the point under `anchor` (offset
    /// from the centre in pixels) fixed on screen.
    pub fn zoomed_about(&self, delta: f64, anchor: [f64; 2]) -> Self {
        let zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        let fixed = self.position_at(anchor);
        let [fx, fy] = project(fixed, zoom);
        let center = unproject([fx - anchor[0], fy - anchor[1]], zoom);
        Self::centered_on(center, zoom)
    }
}

/// Size of the whole world in pixels at `zoom`.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Web Mercator projection to world pixels, origin at the north-west corner.
pub fn project(position: Position, zoom: f64) -> [f64; 2] {
    let size = world_size(zoom);
    let lat = position.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (position.longitude + 180.) / 360. * size;
    let y = (1. - (PI / 4. + lat / 2.).tan().ln() / PI) / 2. * size;
    [x, y]
}

pub fn unproject([x, y]: [f64; 2], zoom: f64) -> Position {
    let size = world_size(zoom);
    let longitude = x / size * 360. - 180.;
    let n = PI * (1. - 2. * y / size);
    let latitude = n.sinh().atan().to_degrees();
    Position::new(latitude, longitude)
}

fn wrap_longitude(lng: f64) -> f64 {
    if (-180. ..=180.).contains(&lng) {
        return lng;
    }
    (lng + 180.).rem_euclid(360.) - 180.
}
