//! Overlay request resolution.
//!
//! Turns the current UI state plus the static per-mode defaults into the
//! exact WMS layer and parameters to request. Pure: the same inputs always
//! produce the same [`RequestedOverlay`].

use std::collections::BTreeMap;
use std::fmt;

use flood_common::{Extent, LayerConfig, UiState, ViewMode, ViewerConfig};
use serde::Serialize;

pub const PARAM_LAYERS: &str = "LAYERS";
pub const PARAM_FORMAT: &str = "FORMAT";
pub const PARAM_TRANSPARENT: &str = "TRANSPARENT";
pub const PARAM_TIME: &str = "TIME";

const OVERLAY_FORMAT: &str = "image/png";

/// A query parameter value: either text or a boolean flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Flag(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Flag(b)
    }
}

/// Fully specified overlay to hand to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestedOverlay {
    pub server_layer_name: String,
    pub query_params: BTreeMap<String, ParamValue>,
    pub extent: Extent,
    pub has_time_param: bool,
}

impl RequestedOverlay {
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.query_params.get(key)
    }
}

/// Static inputs to [`resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub default_max_depth: LayerConfig,
    pub default_time_series: LayerConfig,
    pub workspace: String,
}

impl From<&ViewerConfig> for ResolverConfig {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            default_max_depth: config.max_depth_layer.clone(),
            default_time_series: config.timeseries_layer.layer.clone(),
            workspace: config.workspace.clone(),
        }
    }
}

/// Decide which layer to request and with which parameters.
///
/// Layer precedence: an explicitly picked catalog layer, then the max-depth
/// default, then the time-series default. A picked layer is displayed with
/// the max-depth extent since per-layer extents are not fetched.
///
/// `TIME` is added when the active mode is time-series, whatever layer was
/// picked. Picking a `_timeseries` layer switches the mode beforehand, which
/// is what makes its TIME parameter appear.
pub fn resolve(state: &UiState, config: &ResolverConfig) -> RequestedOverlay {
    let (server_layer_name, extent) = match (&state.selected_dynamic_layer, state.active_mode) {
        (Some(picked), _) => (picked.clone(), config.default_max_depth.extent()),
        (None, ViewMode::MaxDepth) => (
            config.default_max_depth.name.clone(),
            config.default_max_depth.extent(),
        ),
        (None, ViewMode::TimeSeries) => (
            config.default_time_series.name.clone(),
            config.default_time_series.extent(),
        ),
    };

    let mut query_params = BTreeMap::new();
    query_params.insert(
        PARAM_LAYERS.to_string(),
        ParamValue::Text(format!("{}:{}", config.workspace, server_layer_name)),
    );
    query_params.insert(PARAM_FORMAT.to_string(), OVERLAY_FORMAT.into());
    query_params.insert(PARAM_TRANSPARENT.to_string(), true.into());

    let has_time_param = state.active_mode == ViewMode::TimeSeries;
    if has_time_param {
        query_params.insert(PARAM_TIME.to_string(), state.time_step.encode().into());
    }

    RequestedOverlay {
        server_layer_name,
        query_params,
        extent,
        has_time_param,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_common::{BoundingBox, CrsCode, TimeStep};

    fn config() -> ResolverConfig {
        ResolverConfig {
            default_max_depth: LayerConfig {
                name: "mahanadi_dam_release_max_depth".into(),
                title: "Max Depth".into(),
                bbox: BoundingBox::new(392635.0, 2248090.0, 417935.0, 2263390.0),
                projection: CrsCode::UtmNorth(45),
            },
            default_time_series: LayerConfig {
                name: "timeseries".into(),
                title: "Time Series".into(),
                bbox: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
                projection: CrsCode::Epsg4326,
            },
            workspace: "anuga".into(),
        }
    }

    fn state(mode: ViewMode, step: u32, picked: Option<&str>) -> UiState {
        UiState {
            active_mode: mode,
            time_step: TimeStep::new(step).unwrap(),
            selected_dynamic_layer: picked.map(str::to_string),
            is_loading: false,
        }
    }

    #[test]
    fn test_max_depth_default() {
        let overlay = resolve(&state(ViewMode::MaxDepth, 1, None), &config());
        assert_eq!(overlay.server_layer_name, "mahanadi_dam_release_max_depth");
        assert_eq!(
            overlay.param(PARAM_LAYERS),
            Some(&ParamValue::Text("anuga:mahanadi_dam_release_max_depth".into()))
        );
        assert_eq!(overlay.param(PARAM_FORMAT), Some(&ParamValue::Text("image/png".into())));
        assert_eq!(overlay.param(PARAM_TRANSPARENT), Some(&ParamValue::Flag(true)));
        assert_eq!(overlay.param(PARAM_TIME), None);
        assert!(!overlay.has_time_param);
        assert_eq!(overlay.extent.crs, CrsCode::UtmNorth(45));
    }

    #[test]
    fn test_time_series_default_gets_time() {
        let overlay = resolve(&state(ViewMode::TimeSeries, 3, None), &config());
        assert_eq!(overlay.server_layer_name, "timeseries");
        assert_eq!(
            overlay.param(PARAM_TIME),
            Some(&ParamValue::Text("0003-01-01T00:00:00.000Z".into()))
        );
        assert!(overlay.has_time_param);
        assert_eq!(overlay.extent, config().default_time_series.extent());
    }

    #[test]
    fn test_picked_layer_uses_max_depth_extent() {
        let overlay = resolve(
            &state(ViewMode::TimeSeries, 2, Some("flood_event_a_timeseries")),
            &config(),
        );
        assert_eq!(overlay.server_layer_name, "flood_event_a_timeseries");
        assert_eq!(
            overlay.param(PARAM_LAYERS),
            Some(&ParamValue::Text("anuga:flood_event_a_timeseries".into()))
        );
        assert_eq!(overlay.extent, config().default_max_depth.extent());
        assert!(overlay.has_time_param);
    }

    #[test]
    fn test_time_keyed_on_mode_not_pick() {
        // A timeseries-looking pick in max-depth mode gets no TIME.
        let overlay = resolve(
            &state(ViewMode::MaxDepth, 4, Some("flood_event_a_timeseries")),
            &config(),
        );
        assert!(!overlay.has_time_param);
        assert!(!overlay.query_params.contains_key(PARAM_TIME));

        // An unclassifiable pick in time-series mode does get it.
        let overlay = resolve(&state(ViewMode::TimeSeries, 4, Some("dem")), &config());
        assert!(overlay.has_time_param);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let s = state(ViewMode::TimeSeries, 7, Some("x_timeseries"));
        let a = serde_json::to_vec(&resolve(&s, &config())).unwrap();
        let b = serde_json::to_vec(&resolve(&s, &config())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_param_value_serialization() {
        let json = serde_json::to_string(&resolve(&state(ViewMode::MaxDepth, 1, None), &config()))
            .unwrap();
        assert!(json.contains("\"TRANSPARENT\":true"));
        assert!(json.contains("\"FORMAT\":\"image/png\""));
        assert!(json.contains("\"crs\":\"EPSG:32645\""));
    }
}
