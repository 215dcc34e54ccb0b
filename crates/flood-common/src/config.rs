//! Static viewer configuration.
//!
//! Loaded once at startup from YAML, or taken from [`ViewerConfig::default`]
//! which mirrors the Mahanadi dam-release deployment.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bbox::{BoundingBox, Extent};
use crate::crs::CrsCode;
use crate::error::{ViewerError, ViewerResult};
use crate::time::MAX_TIME_STEP;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Server root, e.g. "http://localhost:8080/geoserver"
    pub base_url: String,
    /// Server workspace holding the simulation layers
    pub workspace: String,
    #[serde(default)]
    pub credentials: Credentials,
    pub max_depth_layer: LayerConfig,
    pub timeseries_layer: TimeSeriesLayerConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub viewport: Viewport,
}

/// One static layer: server name, title and display extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub bbox: BoundingBox,
    pub projection: CrsCode,
}

impl LayerConfig {
    pub fn extent(&self) -> Extent {
        Extent::new(self.bbox, self.projection)
    }
}

/// The time-series layer adds the number of published steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesLayerConfig {
    #[serde(flatten)]
    pub layer: LayerConfig,
    pub time_steps: u32,
}

/// Basic-auth credentials passed to both collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "geoserver".to_string(),
        }
    }
}

/// Where the layer catalog comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryKind {
    /// Coverage stores listed through the REST API
    #[default]
    Rest,
    /// Layer names from the workspace WMS GetCapabilities document
    Capabilities,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub kind: DiscoveryKind,
}

/// Pixel size of the rendered overlay image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 768,
            height: 512,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let bbox = BoundingBox::new(392635.0, 2248090.0, 417935.0, 2263390.0);
        let projection = CrsCode::UtmNorth(45);

        Self {
            base_url: "http://localhost:8080/geoserver".to_string(),
            workspace: "anuga".to_string(),
            credentials: Credentials::default(),
            max_depth_layer: LayerConfig {
                name: "mahanadi_dam_release_max_depth".to_string(),
                title: "Max Depth".to_string(),
                bbox,
                projection,
            },
            timeseries_layer: TimeSeriesLayerConfig {
                layer: LayerConfig {
                    name: "timeseries".to_string(),
                    title: "Time Series".to_string(),
                    bbox,
                    projection,
                },
                time_steps: 25,
            },
            discovery: DiscoveryConfig::default(),
            viewport: Viewport::default(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a YAML file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> ViewerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ViewerError::ConfigRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_yaml(&content)?;
        info!(path = %path.display(), workspace = %config.workspace, "Loaded viewer config");
        Ok(config)
    }

    /// Parse configuration from a YAML string and validate it.
    pub fn from_yaml(content: &str) -> ViewerResult<Self> {
        let config: ViewerConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> ViewerResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ViewerError::InvalidConfig("base_url must not be empty".into()));
        }
        if self.workspace.trim().is_empty() {
            return Err(ViewerError::InvalidConfig("workspace must not be empty".into()));
        }

        for (key, layer) in [
            ("max_depth_layer", &self.max_depth_layer),
            ("timeseries_layer", &self.timeseries_layer.layer),
        ] {
            if layer.name.trim().is_empty() {
                return Err(ViewerError::InvalidConfig(format!(
                    "{}.name must not be empty",
                    key
                )));
            }
            if !layer.bbox.is_valid() {
                return Err(ViewerError::InvalidConfig(format!(
                    "{}.bbox must satisfy min < max on both axes, got {:?}",
                    key,
                    <[f64; 4]>::from(layer.bbox)
                )));
            }
        }

        let steps = self.timeseries_layer.time_steps;
        if !(1..=MAX_TIME_STEP).contains(&steps) {
            return Err(ViewerError::InvalidConfig(format!(
                "timeseries_layer.time_steps must be within 1..={}, got {}",
                MAX_TIME_STEP, steps
            )));
        }

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ViewerError::InvalidConfig(
                "viewport width and height must be > 0".into(),
            ));
        }

        debug!(time_steps = steps, "Config validated");
        Ok(())
    }

    /// Server root without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// `{base_url}/{workspace}/wms`, the GetMap endpoint.
    pub fn wms_url(&self) -> String {
        format!("{}/{}/wms", self.base_url(), self.workspace)
    }

    /// Highest selectable time step.
    pub fn max_time_step(&self) -> u32 {
        self.timeseries_layer.time_steps
    }
}
