//! Common types and utilities shared across the flood overlay viewer crates.

pub mod bbox;
pub mod catalog;
pub mod config;
pub mod crs;
pub mod error;
pub mod layer;
pub mod state;
pub mod time;

pub use bbox::{BoundingBox, Extent};
pub use catalog::{LayerCatalog, PartitionedLayers};
pub use config::{
    Credentials, DiscoveryConfig, DiscoveryKind, LayerConfig, TimeSeriesLayerConfig, Viewport,
    ViewerConfig,
};
pub use crs::CrsCode;
pub use error::{ViewerError, ViewerResult};
pub use layer::{classify, display_label, LayerCategory, ViewMode};
pub use state::UiState;
pub use time::{TimeCodecError, TimeStep};
