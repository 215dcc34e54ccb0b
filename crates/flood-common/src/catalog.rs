//! Catalog of server-published layers.
//!
//! A snapshot is fetched once from the discovery collaborator and replaced
//! wholesale. Presentation splits it into a max-depth group and a
//! time-series group, each ordered by display label.

use feruca::Collator;
use serde::Serialize;

use crate::layer::{classify, display_label, LayerCategory};

/// The categorized, sorted view of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionedLayers {
    pub max_depth: Vec<String>,
    pub time_series: Vec<String>,
}

impl PartitionedLayers {
    /// Menu order: max-depth group first, then time-series group.
    pub fn menu(&self) -> impl Iterator<Item = &str> {
        self.max_depth
            .iter()
            .chain(self.time_series.iter())
            .map(String::as_str)
    }

    /// Identifier at a zero-based menu position.
    pub fn menu_entry(&self, index: usize) -> Option<&str> {
        self.menu().nth(index)
    }

    pub fn len(&self) -> usize {
        self.max_depth.len() + self.time_series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.max_depth.is_empty() && self.time_series.is_empty()
    }
}

/// Split a snapshot into display groups, dropping `Unknown` identifiers.
pub fn partition(snapshot: &[String]) -> PartitionedLayers {
    let mut max_depth = Vec::new();
    let mut time_series = Vec::new();

    for id in snapshot {
        match classify(id) {
            LayerCategory::MaxDepth => max_depth.push(id.clone()),
            LayerCategory::TimeSeries => time_series.push(id.clone()),
            LayerCategory::Unknown => {}
        }
    }

    sort_by_label(&mut max_depth);
    sort_by_label(&mut time_series);

    PartitionedLayers {
        max_depth,
        time_series,
    }
}

/// True iff the snapshot has no entries at all.
pub fn is_empty(snapshot: &[String]) -> bool {
    snapshot.is_empty()
}

/// Label order under the CLDR root collation, so case and accents do not
/// push a label out of reading order. `sort_by` is stable, so ties keep
/// snapshot order.
fn sort_by_label(ids: &mut Vec<String>) {
    let mut collator = Collator::default();
    let mut keyed: Vec<(String, String)> = ids
        .drain(..)
        .map(|id| (display_label(&id), id))
        .collect();
    keyed.sort_by(|a, b| collator.collate(a.0.as_str(), b.0.as_str()));
    ids.extend(keyed.into_iter().map(|(_, id)| id));
}

/// Owned catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct LayerCatalog {
    entries: Vec<String>,
}

impl LayerCatalog {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Raw snapshot in server order, unknown identifiers included.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        is_empty(&self.entries)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.iter().any(|e| e == identifier)
    }

    pub fn partition(&self) -> PartitionedLayers {
        partition(&self.entries)
    }

    /// Swap in a freshly fetched snapshot.
    pub fn replace(&mut self, entries: Vec<String>) {
        self.entries = entries;
    }
}
