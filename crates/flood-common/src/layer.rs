//! Layer name classification.
//!
//! Server layers carry their category in the name suffix:
//! `mahanadi_dam_release_max_depth` is a maximum-depth raster,
//! `flood_event_a_timeseries` a time-indexed mosaic. Everything else is
//! `Unknown` and is never shown in the categorized menus.

use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_DEPTH_SUFFIX: &str = "_max_depth";
const TIMESERIES_SUFFIX: &str = "_timeseries";

/// Category derived from a layer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerCategory {
    MaxDepth,
    TimeSeries,
    Unknown,
}

impl LayerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerCategory::MaxDepth => "maxdepth",
            LayerCategory::TimeSeries => "timeseries",
            LayerCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LayerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two static display modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    MaxDepth,
    TimeSeries,
}

impl ViewMode {
    /// Mode implied by a layer category, if any.
    pub fn from_category(category: LayerCategory) -> Option<Self> {
        match category {
            LayerCategory::MaxDepth => Some(ViewMode::MaxDepth),
            LayerCategory::TimeSeries => Some(ViewMode::TimeSeries),
            LayerCategory::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::MaxDepth => "maxdepth",
            ViewMode::TimeSeries => "timeseries",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a layer identifier by its suffix.
pub fn classify(identifier: &str) -> LayerCategory {
    if identifier.ends_with(TIMESERIES_SUFFIX) {
        LayerCategory::TimeSeries
    } else if identifier.ends_with(MAX_DEPTH_SUFFIX) {
        LayerCategory::MaxDepth
    } else {
        LayerCategory::Unknown
    }
}

/// Human-readable label for a layer identifier.
///
/// Strips at most one category suffix, then title-cases each
/// underscore-separated word. Consecutive underscores produce empty words,
/// so `"a__b"` becomes `"A  B"`.
pub fn display_label(identifier: &str) -> String {
    let stem = identifier
        .strip_suffix(MAX_DEPTH_SUFFIX)
        .or_else(|| identifier.strip_suffix(TIMESERIES_SUFFIX))
        .unwrap_or(identifier);

    stem.split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
