mod cluster;
mod error;
mod event;
mod favourites;
mod feature;
mod filter;
mod generator;
mod map_view;
mod selection;
mod settings;
mod storage;
mod store;
mod surface;

pub mod events;
pub mod viewport;

pub use self::cluster::{
    abbreviate, cluster_features, ClusterConfig, ClusterItem, ClusterStyle, PointStyleConfig,
    Tier, TierSteps,
};
pub use self::error::{StorageError, SurfaceError};
pub use self::event::{Category, EventId, HistoricalEvent, Position};
pub use self::favourites::{Favourites, FAVOURITES_KEY};
pub use self::feature::{Feature, FeatureCollection, FeatureProperties, Point};
pub use self::filter::CategoryFilter;
pub use self::generator::{EventGenerator, DEFAULT_EVENT_COUNT};
pub use self::map_view::MapView;
pub use self::selection::Selection;
pub use self::settings::{SettingsNavigation, SettingsStyle};
pub use self::storage::{KeyValueStore, MemoryStore};
pub use self::store::EventStore;
pub use self::surface::MapSurface;
pub use self::viewport::Viewport;
