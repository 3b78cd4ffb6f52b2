//! Immutable per-pass layout snapshot.

use crate::config::ColumnCount;
use crate::model::ItemId;
use serde::Serialize;
use std::collections::HashMap;

/// Rectangle assigned to one item by a packing pass.
///
/// `width` always equals the shared column width. `height` is either a
/// measured override or the estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPosition {
    /// Item this rectangle belongs to.
    pub id: ItemId,
    /// Left edge, including container padding (px).
    pub x: f64,
    /// Top edge (px).
    pub y: f64,
    /// Column width (px).
    pub width: f64,
    /// Measured or estimated height (px).
    pub height: f64,
    /// 0-based column index.
    pub column: usize,
}

impl ItemPosition {
    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Same rectangle and column, ignoring the id.
    pub fn same_geometry(&self, other: &ItemPosition) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
            && self.column == other.column
    }
}

/// Result of one full packing pass.
///
/// Recomputed wholesale every pass and never patched, so equal inputs
/// always produce equal snapshots.
///
/// # Invariants
/// - `column_heights.len() == column_count`
/// - every id in `positions` appears exactly once in `order`
/// - positions sharing a column never overlap vertically
/// - `container_height == max(column_heights) - gap` when at least one item
///   was placed, `0` otherwise
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    /// Position per id. Iteration order is unspecified.
    pub positions: HashMap<ItemId, ItemPosition>,
    /// Ids in the authoritative order they were packed.
    pub order: Vec<ItemId>,
    /// Running column totals, each including its trailing gap.
    pub column_heights: Vec<f64>,
    /// Tallest column minus its trailing gap.
    pub container_height: f64,
    /// Width shared by every column (px).
    pub column_width: f64,
    /// Columns resolved for the container width.
    pub column_count: ColumnCount,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::empty(ColumnCount::ONE, 0.0)
    }
}

impl LayoutState {
    /// A snapshot with no items.
    pub fn empty(column_count: ColumnCount, column_width: f64) -> Self {
        Self {
            positions: HashMap::new(),
            order: Vec::new(),
            column_heights: vec![0.0; column_count.as_usize()],
            container_height: 0.0,
            column_width,
            column_count,
        }
    }

    /// Look up a position. `None` for unknown ids.
    pub fn position(&self, id: &str) -> Option<&ItemPosition> {
        self.positions.get(id)
    }

    /// Positions in item order.
    pub fn ordered_positions(&self) -> impl Iterator<Item = &ItemPosition> + '_ {
        self.order.iter().filter_map(|id| self.positions.get(id))
    }

    /// Maximum `y + height` over all positions, `0` when empty.
    pub fn max_bottom(&self) -> f64 {
        self.positions
            .values()
            .map(ItemPosition::bottom)
            .fold(0.0, f64::max)
    }

    /// Number of packed items.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if nothing was packed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
