//! Measured height overrides.

use crate::model::ItemId;
use std::collections::HashMap;

/// Measured heights keyed by item id.
///
/// Written only by the orchestrator once a materialized item reports its
/// true size. An override always replaces the estimate, never the reverse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeightOverrides {
    heights: HashMap<ItemId, f64>,
}

impl HeightOverrides {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Measured height of `id`, if any.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.heights.get(id).copied()
    }

    /// Record a measured height.
    ///
    /// Returns `true` only when the stored value changed. Recording the value
    /// already on file is a no-op, which keeps measure/relayout from cycling.
    pub fn record(&mut self, id: ItemId, height: f64) -> bool {
        match self.heights.get(&id) {
            Some(current) if *current == height => false,
            _ => {
                self.heights.insert(id, height);
                true
            }
        }
    }

    /// Forget `id`, returning its height.
    pub fn remove(&mut self, id: &str) -> Option<f64> {
        self.heights.remove(id)
    }

    /// Forget every measurement.
    pub fn clear(&mut self) {
        self.heights.clear();
    }

    /// Number of measured ids.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// True if nothing has been measured.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Measured heights in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, f64)> + '_ {
        self.heights.iter().map(|(id, h)| (id, *h))
    }
}

impl FromIterator<(ItemId, f64)> for HeightOverrides {
    fn from_iter<T: IntoIterator<Item = (ItemId, f64)>>(iter: T) -> Self {
        Self {
            heights: iter.into_iter().collect(),
        }
    }
}
