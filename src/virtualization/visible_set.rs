//! Result of a visibility computation.

use crate::layout::ItemPosition;
use crate::model::ItemId;
use serde::Serialize;
use std::ops::Range;

/// One item that intersects the overscanned viewport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleItem {
    /// Index of the item in the authoritative item order.
    pub index: usize,
    /// Item id.
    pub id: ItemId,
    /// Position from the layout pass.
    pub position: ItemPosition,
}

/// Items intersecting the viewport, in item order.
///
/// # Invariants
/// - indices are strictly increasing
/// - every entry has a position in the layout it was computed from
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VisibleSet {
    items: Vec<VisibleItem>,
}

impl VisibleSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_items(items: Vec<VisibleItem>) -> Self {
        debug_assert!(items.windows(2).all(|w| w[0].index < w[1].index));
        Self { items }
    }

    /// Number of visible items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Visible items in item order.
    pub fn iter(&self) -> std::slice::Iter<'_, VisibleItem> {
        self.items.iter()
    }

    /// Visible items as a slice.
    pub fn as_slice(&self) -> &[VisibleItem] {
        &self.items
    }

    /// Visible ids in item order.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.items.iter().map(|item| &item.id)
    }

    /// True if `id` is visible.
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id.as_str() == id)
    }

    /// Same length, ids and order. Positions are ignored.
    pub fn same_members(&self, other: &VisibleSet) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(&other.items)
                .all(|(a, b)| a.id == b.id)
    }

    /// `first index..last index + 1`, or `0..0` when empty.
    pub fn index_range(&self) -> Range<usize> {
        match (self.items.first(), self.items.last()) {
            (Some(first), Some(last)) => first.index..last.index + 1,
            _ => 0..0,
        }
    }
}

impl<'a> IntoIterator for &'a VisibleSet {
    type Item = &'a VisibleItem;
    type IntoIter = std::slice::Iter<'a, VisibleItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Outcome of recomputing the visible set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityUpdate {
    /// Membership or order changed; consumers should reconcile.
    Changed,
    /// Same ids in the same order as before; nothing to do.
    Unchanged,
}

impl VisibilityUpdate {
    /// True for [`VisibilityUpdate::Changed`].
    pub fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(index: usize, id: &str, y: f64) -> VisibleItem {
        let id = ItemId::new(id).unwrap();
        VisibleItem {
            index,
            id: id.clone(),
            position: ItemPosition {
                id,
                x: 0.0,
                y,
                width: 100.0,
                height: 50.0,
                column: 0,
            },
        }
    }

    #[test]
    fn empty_set_has_empty_range() {
        let set = VisibleSet::new();
        assert!(set.is_empty());
        assert_eq!(set.index_range(), 0..0);
    }

    #[test]
    fn range_end_is_exclusive() {
        let set = VisibleSet::from_items(vec![item(3, "d", 0.0), item(7, "h", 0.0)]);
        assert_eq!(set.index_range(), 3..8);
    }

    #[test]
    fn same_members_ignores_positions() {
        let a = VisibleSet::from_items(vec![item(0, "a", 0.0), item(1, "b", 10.0)]);
        let b = VisibleSet::from_items(vec![item(0, "a", 99.0), item(1, "b", 120.0)]);
        assert!(a.same_members(&b));
    }

    #[test]
    fn same_members_detects_order_and_length() {
        let a = VisibleSet::from_items(vec![item(0, "a", 0.0), item(1, "b", 0.0)]);
        let swapped = VisibleSet::from_items(vec![item(0, "b", 0.0), item(1, "a", 0.0)]);
        let shorter = VisibleSet::from_items(vec![item(0, "a", 0.0)]);
        assert!(!a.same_members(&swapped));
        assert!(!a.same_members(&shorter));
    }

    #[test]
    fn contains_looks_up_by_id() {
        let set = VisibleSet::from_items(vec![item(0, "a", 0.0)]);
        assert!(set.contains("a"));
        assert!(!set.contains("b"));
    }
}
