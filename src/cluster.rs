use std::collections::HashMap;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::{
    viewport::{project, unproject, MAX_ZOOM},
    EventId, Feature, Position, SurfaceError,
};

/// Clustering and styling parameters handed to the map surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Identifier of the feature source the layers draw from.
    pub source_id: String,
    pub enabled: bool,
    /// Highest integer zoom at which points are still merged.
    pub max_zoom: u8,
    /// Cluster membership radius in screen pixels.
    pub radius: f32,
    pub tiers: TierSteps,
    pub point: PointStyleConfig,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            source_id: "events".to_string(),
            enabled: true,
            max_zoom: 14,
            radius: 50.,
            tiers: TierSteps::default(),
            point: PointStyleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// `#rrggbb` colour.
    pub color: String,
    pub radius: f32,
}

/// Three-tier step encoding keyed by cluster point count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierSteps {
    pub small: Tier,
    /// Point count from which the medium tier applies.
    pub medium_from: usize,
    pub medium: Tier,
    /// Point count from which the large tier applies.
    pub large_from: usize,
    pub large: Tier,
}

impl Default for TierSteps {
    fn default() -> Self {
        Self {
            small: Tier {
                color: "#51bbd6".to_string(),
                radius: 20.,
            },
            medium_from: 100,
            medium: Tier {
                color: "#f1f075".to_string(),
                radius: 30.,
            },
            large_from: 750,
            large: Tier {
                color: "#f28cb1".to_string(),
                radius: 40.,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyleConfig {
    pub color: String,
    pub radius: f32,
    pub stroke_width: f32,
    pub stroke_color: String,
}

impl Default for PointStyleConfig {
    fn default() -> Self {
        Self {
            color: "#11b4da".to_string(),
            radius: 8.,
            stroke_width: 1.,
            stroke_color: "#ffffff".to_string(),
        }
    }
}

/// Validated, drawable form of [`ClusterConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterStyle {
    tiers: [(usize, Color32, f32); 3],
    pub point_color: Color32,
    pub point_radius: f32,
    pub point_stroke_width: f32,
    pub point_stroke_color: Color32,
}

impl ClusterStyle {
    /// Colour and radius for a cluster holding `point_count` points.
    pub fn tier(&self, point_count: usize) -> (Color32, f32) {
        let (_, color, radius) = self
            .tiers
            .iter()
            .rev()
            .find(|(from, _, _)| point_count >= *from)
            .copied()
            .unwrap_or(self.tiers[0]);
        (color, radius)
    }

    pub fn max_radius(&self) -> f32 {
        self.tiers
            .iter()
            .map(|t| t.2)
            .fold(self.point_radius + self.point_stroke_width, f32::max)
    }
}

impl ClusterConfig {
    /// # Errors
    /// Returns [`SurfaceError::InvalidConfig`] if the radius, zoom, breakpoints or
    /// any colour is unusable.
    pub fn style(&self) -> Result<ClusterStyle, SurfaceError> {
        if !(self.radius.is_finite() && self.radius > 0.) {
            return Err(SurfaceError::InvalidConfig(format!(
                "cluster radius must be positive, got {}",
                self.radius
            )));
        }
        if f64::from(self.max_zoom) > MAX_ZOOM {
            return Err(SurfaceError::InvalidConfig(format!(
                "cluster max zoom must be at most {MAX_ZOOM}, got {}",
                self.max_zoom
            )));
        }

        let t = &self.tiers;
        if t.medium_from < 2 || t.large_from <= t.medium_from {
            return Err(SurfaceError::InvalidConfig(format!(
                "tier breakpoints must be ascending and above 1, got {} and {}",
                t.medium_from, t.large_from
            )));
        }
        for radius in [t.small.radius, t.medium.radius, t.large.radius, self.point.radius] {
            if !(radius.is_finite() && radius > 0.) {
                return Err(SurfaceError::InvalidConfig(format!(
                    "marker radius must be positive, got {radius}"
                )));
            }
        }

        Ok(ClusterStyle {
            tiers: [
                (0, parse_color(&t.small.color)?, t.small.radius),
                (t.medium_from, parse_color(&t.medium.color)?, t.medium.radius),
                (t.large_from, parse_color(&t.large.color)?, t.large.radius),
            ],
            point_color: parse_color(&self.point.color)?,
            point_radius: self.point.radius,
            point_stroke_width: self.point.stroke_width.max(0.),
            point_stroke_color: parse_color(&self.point.stroke_color)?,
        })
    }

    /// Cache key for the clustering of a fractional zoom. Every zoom past
    /// `max_zoom` shares one key since nothing is merged there.
    pub fn level_for(&self, zoom: f64) -> u8 {
        let level = zoom.floor().clamp(0., f64::from(self.max_zoom) + 1.);
        level as u8
    }
}

fn parse_color(hex: &str) -> Result<Color32, SurfaceError> {
    Color32::from_hex(hex)
        .map_err(|e| SurfaceError::InvalidConfig(format!("bad colour {hex:?}: {e:?}")))
}

/// Short label for a cluster count: `999`, `1.2k`, `15k`.
pub fn abbreviate(count: usize) -> String {
    if count >= 10_000 {
        return format!("{}k", (count as f64 / 1000.).round());
    }
    if count >= 1_000 {
        let tenths = (count as f64 / 100.).round() / 10.;
        if tenths.fract() == 0. {
            return format!("{tenths:.0}k");
        }
        return format!("{tenths:.1}k");
    }
    count.to_string()
}

/// Element drawn by the surface at a given zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClusterItem {
    Cluster {
        position: Position,
        point_count: usize,
    },
    Point {
        id: EventId,
        position: Position,
    },
}

impl ClusterItem {
    pub fn position(&self) -> Position {
        match self {
            ClusterItem::Cluster { position, .. } | ClusterItem::Point { position, .. } => {
                *position
            }
        }
    }

    pub fn point_count(&self) -> usize {
        match self {
            ClusterItem::Cluster { point_count, .. } => *point_count,
            ClusterItem::Point { .. } => 1,
        }
    }
}

/// Merges features for an integer zoom `level`.
///
/// Points are projected to world pixels at `level` and bucketed into square
/// cells of `radius` pixels. Cells holding two or more points become a
/// cluster placed at their centroid. Past `max_zoom`, or with clustering
/// disabled, every feature is returned as a point.
pub fn cluster_features(
    features: &[Feature],
    level: u8,
    config: &ClusterConfig,
) -> Vec<ClusterItem> {
    if !config.enabled || level > config.max_zoom {
        return features
            .iter()
            .map(|f| ClusterItem::Point {
                id: f.id(),
                position: f.position(),
            })
            .collect();
    }

    struct Cell {
        sum: [f64; 2],
        members: Vec<usize>,
    }

    let zoom = f64::from(level);
    let radius = f64::from(config.radius);
    let mut cells: Vec<Cell> = Vec::new();
    let mut by_key: HashMap<(i64, i64), usize> = HashMap::new();

    for (idx, f) in features.iter().enumerate() {
        let [x, y] = project(f.position(), zoom);
        let key = ((x / radius).floor() as i64, (y / radius).floor() as i64);
        let cell_idx = *by_key.entry(key).or_insert_with(|| {
            cells.push(Cell {
                sum: [0., 0.],
                members: Vec::new(),
            });
            cells.len() - 1
        });
        let cell = &mut cells[cell_idx];
        cell.sum[0] += x;
        cell.sum[1] += y;
        cell.members.push(idx);
    }

    cells
        .into_iter()
        .map(|cell| {
            if let [only] = cell.members[..] {
                let f = &features[only];
                return ClusterItem::Point {
                    id: f.id(),
                    position: f.position(),
                };
            }
            let n = cell.members.len() as f64;
            ClusterItem::Cluster {
                position: unproject([cell.sum[0] / n, cell.sum[1] / n], zoom),
                point_count: cell.members.len(),
            }
        })
        .collect()
}
