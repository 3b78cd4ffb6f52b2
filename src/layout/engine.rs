//! Column-balanced packing.
//!
//! Each item goes into the currently shortest column, in authoritative order.
//! The pass is a pure function of `(order, heights, width, config)`.

use super::css::CssVariables;
use super::overrides::HeightOverrides;
use super::state::{ItemPosition, LayoutState};
use crate::config::{ColumnCount, LayoutConfig};
use crate::model::ItemId;
use std::collections::HashMap;
use std::sync::Arc;

/// Width of one column for a container width and column count.
///
/// `(container_width - gap * (columns - 1) - 2 * padding) / columns`.
/// Not clamped: a too-narrow container yields zero or negative widths.
pub fn column_width(container_width: f64, columns: ColumnCount, config: &LayoutConfig) -> f64 {
    let n = f64::from(columns.get());
    (container_width - config.gap * (n - 1.0) - 2.0 * config.padding) / n
}

/// Index of the shortest column; the leftmost wins ties.
fn shortest_column(column_heights: &[f64]) -> usize {
    let mut index = 0;
    let mut best = column_heights.first().copied().unwrap_or(0.0);
    for (i, height) in column_heights.iter().enumerate().skip(1) {
        if *height < best {
            best = *height;
            index = i;
        }
    }
    index
}

/// Run one packing pass.
///
/// Heights come from `overrides` when present, else
/// `config.estimated_item_height`. Repeated ids after the first occurrence
/// are skipped.
pub fn calculate<'a, I>(
    ids: I,
    container_width: f64,
    config: &LayoutConfig,
    overrides: &HeightOverrides,
) -> LayoutState
where
    I: IntoIterator<Item = &'a ItemId>,
{
    let column_count = config.columns.resolve(container_width);
    let width = column_width(container_width, column_count, config);
    let mut column_heights = vec![0.0; column_count.as_usize()];
    let mut positions = HashMap::new();
    let mut order = Vec::new();

    for id in ids {
        if positions.contains_key(id) {
            continue;
        }

        let height = overrides
            .get(id.as_str())
            .unwrap_or(config.estimated_item_height);
        let column = shortest_column(&column_heights);
        let position = ItemPosition {
            id: id.clone(),
            x: column as f64 * (width + config.gap) + config.padding,
            y: column_heights[column],
            width,
            height,
            column,
        };
        column_heights[column] += height + config.gap;

        order.push(id.clone());
        positions.insert(id.clone(), position);
    }

    let tallest = column_heights.iter().copied().fold(0.0, f64::max);
    let container_height = if order.is_empty() {
        tallest
    } else {
        tallest - config.gap
    };

    LayoutState {
        positions,
        order,
        column_heights,
        container_height,
        column_width: width,
        column_count,
    }
}

/// Holds the container width, the layout config and the last snapshot.
///
/// Recalculation is always explicit: changing the width or config records
/// the new value and waits for the next `calculate`.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    container_width: f64,
    config: LayoutConfig,
    state: Arc<LayoutState>,
}

impl LayoutEngine {
    /// Engine for a container `container_width` px wide. Nothing is packed until `calculate`.
    pub fn new(container_width: f64, config: LayoutConfig) -> Self {
        let column_count = config.columns.resolve(container_width);
        let state = LayoutState::empty(
            column_count,
            column_width(container_width, column_count, &config),
        );
        Self {
            container_width,
            config,
            state: Arc::new(state),
        }
    }

    /// Record a new width without recomputing.
    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    /// Width the next `calculate` packs into.
    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    /// Replace the config without recomputing.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    /// Current packing geometry.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Pack `ids` with the current width and config and keep the snapshot.
    pub fn calculate<'a, I>(&mut self, ids: I, overrides: &HeightOverrides) -> Arc<LayoutState>
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        let state = calculate(ids, self.container_width, &self.config, overrides);
        self.state = Arc::new(state);
        Arc::clone(&self.state)
    }

    /// Install an empty snapshot for the current width and config.
    pub fn reset(&mut self) -> Arc<LayoutState> {
        let column_count = self.config.columns.resolve(self.container_width);
        let width = column_width(self.container_width, column_count, &self.config);
        self.state = Arc::new(LayoutState::empty(column_count, width));
        Arc::clone(&self.state)
    }

    /// The last computed snapshot.
    pub fn state(&self) -> Arc<LayoutState> {
        Arc::clone(&self.state)
    }

    /// Position from the last snapshot; `None` if the id was not laid out.
    pub fn position(&self, id: &str) -> Option<&ItemPosition> {
        self.state.position(id)
    }

    /// Column width and gap of the last pass.
    pub fn css_variables(&self) -> CssVariables {
        CssVariables {
            column_width: self.state.column_width,
            gap: self.config.gap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnBreakpoint, ColumnSpec};

    fn ids(n: usize) -> Vec<ItemId> {
        (0..n)
            .map(|i| ItemId::new(format!("item-{i}")).unwrap())
            .collect()
    }

    fn fixed(columns: u32, gap: f64) -> LayoutConfig {
        LayoutConfig {
            gap,
            padding: 0.0,
            columns: ColumnSpec::Fixed(ColumnCount::new(columns).unwrap()),
            estimated_item_height: 100.0,
        }
    }

    mod column_width {
        use super::*;

        #[test]
        fn subtracts_gaps_and_padding() {
            let mut config = fixed(3, 10.0);
            config.padding = 5.0;
            let width = column_width(320.0, ColumnCount::new(3).unwrap(), &config);
            assert_eq!(width, (320.0 - 20.0 - 10.0) / 3.0);
        }

        #[test]
        fn degenerate_width_is_not_clamped() {
            let config = fixed(4, 16.0);
            assert!(column_width(0.0, ColumnCount::new(4).unwrap(), &config) < 0.0);
        }
    }

    mod packing {
        use super::*;

        #[test]
        fn equal_heights_alternate_from_leftmost_column() {
            let items = ids(5);
            let state = calculate(&items, 200.0, &fixed(2, 0.0), &HeightOverrides::new());

            let columns: Vec<_> = state.ordered_positions().map(|p| p.column).collect();
            assert_eq!(columns, vec![0, 1, 0, 1, 0]);
            assert_eq!(state.column_heights, vec![300.0, 200.0]);
            assert_eq!(state.container_height, 300.0);
        }

        #[test]
        fn positions_use_column_offsets_and_running_heights() {
            let items = ids(3);
            let state = calculate(&items, 210.0, &fixed(2, 10.0), &HeightOverrides::new());

            let p = state.position("item-1").unwrap();
            assert_eq!(p.column, 1);
            assert_eq!(p.x, 110.0);
            assert_eq!(p.y, 0.0);
            assert_eq!(p.width, 100.0);

            let p = state.position("item-2").unwrap();
            assert_eq!(p.column, 0);
            assert_eq!(p.x, 0.0);
            assert_eq!(p.y, 110.0);
        }

        #[test]
        fn padding_shifts_x() {
            let items = ids(2);
            let mut config = fixed(2, 10.0);
            config.padding = 20.0;
            let state = calculate(&items, 250.0, &config, &HeightOverrides::new());
            assert_eq!(state.position("item-0").unwrap().x, 20.0);
            assert_eq!(state.position("item-1").unwrap().x, 20.0 + 100.0 + 10.0);
        }

        #[test]
        fn overrides_replace_estimate() {
            let items = ids(3);
            let overrides: HeightOverrides = [(items[0].clone(), 300.0)].into_iter().collect();
            let state = calculate(&items, 200.0, &fixed(2, 0.0), &overrides);

            assert_eq!(state.position("item-0").unwrap().height, 300.0);
            // item-1 goes right (0 < 300), item-2 goes right again (100 < 300)
            assert_eq!(state.position("item-1").unwrap().column, 1);
            assert_eq!(state.position("item-2").unwrap().column, 1);
            assert_eq!(state.position("item-2").unwrap().y, 100.0);
        }

        #[test]
        fn container_height_drops_one_trailing_gap() {
            let items = ids(4);
            let state = calculate(&items, 220.0, &fixed(2, 20.0), &HeightOverrides::new());
            assert_eq!(state.column_heights, vec![240.0, 240.0]);
            assert_eq!(state.container_height, 220.0);
        }

        #[test]
        fn empty_input_yields_zero_height() {
            let state = calculate(&Vec::<ItemId>::new(), 800.0, &fixed(3, 16.0), &HeightOverrides::new());
            assert!(state.is_empty());
            assert_eq!(state.container_height, 0.0);
            assert_eq!(state.column_heights.len(), 3);
        }

        #[test]
        fn duplicate_ids_are_packed_once() {
            let mut items = ids(2);
            items.push(items[0].clone());
            let state = calculate(&items, 200.0, &fixed(2, 0.0), &HeightOverrides::new());
            assert_eq!(state.len(), 2);
            assert_eq!(state.positions.len(), 2);
        }

        #[test]
        fn repeated_calls_are_identical() {
            let items = ids(40);
            let overrides: HeightOverrides = items
                .iter()
                .enumerate()
                .map(|(i, id)| (id.clone(), 50.0 + (i * 37 % 200) as f64))
                .collect();
            let config = LayoutConfig::default();
            let first = calculate(&items, 1111.0, &config, &overrides);
            let second = calculate(&items, 1111.0, &config, &overrides);
            assert_eq!(first, second);
        }

        #[test]
        fn responsive_breakpoints_pick_column_count() {
            let items = ids(1);
            let config = LayoutConfig {
                columns: ColumnSpec::Responsive(vec![
                    ColumnBreakpoint::new(1280.0, ColumnCount::new(4).unwrap()),
                    ColumnBreakpoint::new(900.0, ColumnCount::new(3).unwrap()),
                ]),
                ..LayoutConfig::default()
            };
            let state = calculate(&items, 1000.0, &config, &HeightOverrides::new());
            assert_eq!(state.column_count.get(), 3);
            let state = calculate(&items, 800.0, &config, &HeightOverrides::new());
            assert_eq!(state.column_count, ColumnCount::ONE);
        }
    }

    mod engine {
        use super::*;

        #[test]
        fn set_container_width_does_not_recompute() {
            let items = ids(4);
            let mut engine = LayoutEngine::new(200.0, fixed(2, 0.0));
            let before = engine.calculate(&items, &HeightOverrides::new());

            engine.set_container_width(400.0);
            assert_eq!(engine.state(), before);
            assert_eq!(engine.position("item-0").unwrap().width, 100.0);

            engine.calculate(&items, &HeightOverrides::new());
            assert_eq!(engine.position("item-0").unwrap().width, 200.0);
        }

        #[test]
        fn position_of_unknown_id_is_none() {
            let engine = LayoutEngine::new(500.0, LayoutConfig::default());
            assert!(engine.position("nope").is_none());
        }

        #[test]
        fn css_variables_reflect_last_pass() {
            let items = ids(1);
            let mut engine = LayoutEngine::new(210.0, fixed(2, 10.0));
            engine.calculate(&items, &HeightOverrides::new());
            assert_eq!(
                engine.css_variables(),
                CssVariables {
                    column_width: 100.0,
                    gap: 10.0
                }
            );
        }

        #[test]
        fn reset_installs_empty_snapshot() {
            let items = ids(3);
            let mut engine = LayoutEngine::new(200.0, fixed(2, 0.0));
            engine.calculate(&items, &HeightOverrides::new());
            let state = engine.reset();
            assert!(state.is_empty());
            assert_eq!(state.column_heights, vec![0.0, 0.0]);
        }
    }
}
