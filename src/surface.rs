use std::collections::HashMap;

use crate::{
    cluster::{cluster_features, ClusterItem},
    ClusterConfig, ClusterStyle, FeatureCollection, SurfaceError,
};

/// Long-lived state of the map: the feature source, its validated style and
/// the clustering computed so far. [`crate::MapView`] borrows it every frame.
#[derive(Debug, Clone)]
pub struct MapSurface {
    config: ClusterConfig,
    style: ClusterStyle,
    features: FeatureCollection,
    levels: HashMap<u8, Vec<ClusterItem>>,
}

impl MapSurface {
    /// # Errors
    /// Fails with [`SurfaceError::InvalidConfig`] for an unusable cluster
    /// configuration and with [`SurfaceError::InvalidCredential`] when an access
    /// token is given but blank or containing whitespace.
    pub fn new(config: ClusterConfig, access_token: Option<&str>) -> Result<Self, SurfaceError> {
        if let Some(token) = access_token {
            validate_token(token)?;
        }
        let style = config.style()?;

        log::info!(
            "map surface ready: source {:?}, clustering {}, max zoom {}, radius {}px",
            config.source_id,
            if config.enabled { "on" } else { "off" },
            config.max_zoom,
            config.radius
        );

        Ok(Self {
            config,
            style,
            features: FeatureCollection::default(),
            levels: HashMap::new(),
        })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn style(&self) -> &ClusterStyle {
        &self.style
    }

    pub fn features(&self) -> &FeatureCollection {
        &self.features
    }

    /// Replaces the source data and drops all cached clustering.
    pub fn set_data(&mut self, features: FeatureCollection) {
        log::debug!(
            "source {:?}: {} features",
            self.config.source_id,
            features.len()
        );
        self.features = features;
        self.levels.clear();
    }

    /// Items to draw at `zoom`, clustered on first use of each zoom level.
    pub fn items_at(&mut self, zoom: f64) -> &[ClusterItem] {
        let level = self.config.level_for(zoom);
        let (features, config) = (&self.features, &self.config);
        self.levels
            .entry(level)
            .or_insert_with(|| cluster_features(&features.features, level, config))
    }

    pub fn cached_levels(&self) -> usize {
        self.levels.len()
    }
}

fn validate_token(token: &str) -> Result<(), SurfaceError> {
    if token.trim().is_empty() {
        return Err(SurfaceError::InvalidCredential("token is empty".to_string()));
    }
    if token.chars().any(char::is_whitespace) {
        return Err(SurfaceError::InvalidCredential(
            "token contains whitespace".to_string(),
        ));
    }
    Ok(())
}
