//! Catalog, classification and config behavior against realistic layer lists.

use flood_common::catalog::partition;
use flood_common::{
    classify, display_label, LayerCatalog, LayerCategory, TimeStep, UiState, ViewMode,
    ViewerConfig, ViewerError,
};
use test_utils::fixtures::layers;
use test_utils::{config_yaml, write_config_file};

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_classify_published_names() {
    assert_eq!(classify(layers::MAHANADI_MAX_DEPTH), LayerCategory::MaxDepth);
    assert_eq!(classify(layers::EVENT_A_TIMESERIES), LayerCategory::TimeSeries);
    assert_eq!(classify(layers::BARE_TIMESERIES), LayerCategory::TimeSeries);
    assert_eq!(classify(layers::DEM), LayerCategory::Unknown);
}

#[test]
fn test_classify_is_case_sensitive_suffix_match() {
    assert_eq!(classify("run_MAX_DEPTH"), LayerCategory::Unknown);
    assert_eq!(classify("run_max_depth_v2"), LayerCategory::Unknown);
    assert_eq!(classify("run_timeseries_max_depth"), LayerCategory::MaxDepth);
}

#[test]
fn test_display_labels() {
    assert_eq!(display_label(layers::MAHANADI_MAX_DEPTH), "Mahanadi Dam Release");
    assert_eq!(display_label(layers::EVENT_A_TIMESERIES), "Flood Event A");
    assert_eq!(display_label(layers::BARE_TIMESERIES), "");
    assert_eq!(display_label(layers::DEM), "Dem");
}

// ============================================================================
// Partitioning
// ============================================================================

#[test]
fn test_partition_mixed_snapshot() {
    let groups = partition(&layers::mixed());

    assert_eq!(
        groups.max_depth,
        vec![layers::BASIN_MAX_DEPTH, layers::MAHANADI_MAX_DEPTH]
    );
    // Empty label sorts first
    assert_eq!(
        groups.time_series,
        vec![layers::BARE_TIMESERIES, layers::EVENT_A_TIMESERIES]
    );
    assert_eq!(groups.len(), 4);
}

#[test]
fn test_partition_never_invents_entries() {
    let snapshot = layers::mixed();
    let groups = partition(&snapshot);
    for id in groups.menu() {
        assert!(snapshot.iter().any(|s| s == id), "{} not in snapshot", id);
        assert_ne!(classify(id), LayerCategory::Unknown);
    }
}

#[test]
fn test_partition_only_unknown() {
    let snapshot = vec!["dem".to_string(), "roads".to_string()];
    let groups = partition(&snapshot);
    assert!(groups.is_empty());
    // The snapshot itself is not empty
    assert!(!LayerCatalog::new(snapshot).is_empty());
}

#[test]
fn test_partition_ties_keep_snapshot_order() {
    // "B_max_depth" and "b_max_depth" share the label "B"
    let snapshot: Vec<String> = ["B_max_depth", "a_max_depth", "b_max_depth", "a_max_depth"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let groups = partition(&snapshot);
    assert_eq!(
        groups.max_depth,
        vec!["a_max_depth", "a_max_depth", "B_max_depth", "b_max_depth"]
    );
    assert!(groups.time_series.is_empty());
}

#[test]
fn test_partition_accented_labels() {
    let snapshot: Vec<String> = ["Zeta_timeseries", "éclair_timeseries", "delta_timeseries"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let groups = partition(&snapshot);
    assert_eq!(
        groups.time_series,
        vec!["delta_timeseries", "éclair_timeseries", "Zeta_timeseries"]
    );
}

#[test]
fn test_menu_order_and_index() {
    let groups = partition(&layers::mixed());
    assert_eq!(groups.menu_entry(0), Some(layers::BASIN_MAX_DEPTH));
    assert_eq!(groups.menu_entry(2), Some(layers::BARE_TIMESERIES));
    assert_eq!(groups.menu_entry(4), None);
}

#[test]
fn test_catalog_replace() {
    let mut catalog = LayerCatalog::default();
    assert!(catalog.is_empty());

    catalog.replace(layers::mixed());
    assert_eq!(catalog.len(), 5);
    assert!(catalog.contains(layers::DEM));

    catalog.replace(Vec::new());
    assert!(catalog.partition().is_empty());
}

// ============================================================================
// UI state
// ============================================================================

#[test]
fn test_ui_state_default() {
    let state = UiState::default();
    assert_eq!(state.active_mode, ViewMode::MaxDepth);
    assert_eq!(state.time_step, TimeStep::FIRST);
    assert_eq!(state.selected_dynamic_layer, None);
    assert!(!state.is_loading);
}

// ============================================================================
// Config files
// ============================================================================

#[test]
fn test_load_config_file() {
    let file = write_config_file(&config_yaml("http://gs.example.org/geoserver"));
    let config = ViewerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.base_url(), "http://gs.example.org/geoserver");
    assert_eq!(config.max_time_step(), 25);
}

#[test]
fn test_missing_config_file() {
    let err = ViewerConfig::from_file("/nonexistent/flood-viewer.yaml").unwrap_err();
    assert!(matches!(err, ViewerError::ConfigRead { .. }));
}

#[test]
fn test_malformed_config_file() {
    let file = write_config_file("base_url: [unterminated");
    let err = ViewerConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ViewerError::InvalidConfig(_)));
}
