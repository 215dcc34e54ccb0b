//! Common test fixtures for flood viewer tests.
//!
//! Layer names here follow what the simulation publishes: one store per run,
//! suffixed with the product it holds.

use std::io::Write;

use flood_common::ViewerConfig;
use tempfile::NamedTempFile;

/// Server layer names as returned by discovery.
pub mod layers {
    /// Published max-depth raster of the dam release run
    pub const MAHANADI_MAX_DEPTH: &str = "mahanadi_dam_release_max_depth";

    /// Time-series counterpart of a second run
    pub const EVENT_A_TIMESERIES: &str = "flood_event_a_timeseries";

    /// Sorts before the others by label
    pub const BASIN_MAX_DEPTH: &str = "Basin_Upper_max_depth";

    /// Neither suffix; dropped from the menu
    pub const DEM: &str = "dem";

    /// Suffix only, no prefix
    pub const BARE_TIMESERIES: &str = "_timeseries";

    /// A realistic mixed discovery result, in server order.
    pub fn mixed() -> Vec<String> {
        [
            MAHANADI_MAX_DEPTH,
            DEM,
            EVENT_A_TIMESERIES,
            BASIN_MAX_DEPTH,
            BARE_TIMESERIES,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

/// YAML equivalent of [`ViewerConfig::default`] with a caller-chosen server.
pub fn config_yaml(base_url: &str) -> String {
    format!(
        r#"base_url: {base_url}
workspace: anuga
credentials:
  username: admin
  password: geoserver
max_depth_layer:
  name: mahanadi_dam_release_max_depth
  title: Max Depth
  bbox: [392635.0, 2248090.0, 417935.0, 2263390.0]
  projection: EPSG:32645
timeseries_layer:
  name: timeseries
  title: Time Series
  bbox: [392635.0, 2248090.0, 417935.0, 2263390.0]
  projection: EPSG:32645
  time_steps: 25
"#
    )
}

/// Default viewer config pointed at `base_url`.
pub fn config_for(base_url: &str) -> ViewerConfig {
    ViewerConfig {
        base_url: base_url.to_string(),
        ..ViewerConfig::default()
    }
}

/// Write `content` to a temporary `.yaml` file kept alive by the handle.
pub fn write_config_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("create temp config");
    file.write_all(content.as_bytes()).expect("write temp config");
    file
}
