//! Acceptance tests for the documented layout and visibility behaviour.
//!
//! Each test pins one observable property end to end through the public API.

use masonry_virt::config::{
    ColumnBreakpoint, ColumnCount, ColumnSpec, LayoutConfig, MasonryOptions, SchedulingConfig,
};
use masonry_virt::headless::{
    FixedResizeSource, HeadlessRenderer, ManualScrollSource, TableMeasurer,
};
use masonry_virt::layout::{HeightOverrides, LayoutEngine};
use masonry_virt::virtualization::{ScrollState, VirtualizationEngine};
use masonry_virt::{ItemId, Masonry};
use std::fmt::Write as _;
use std::sync::Arc;

fn ids(n: usize) -> Vec<ItemId> {
    (0..n)
        .map(|i| ItemId::new(format!("item-{i}")).unwrap())
        .collect()
}

fn count(n: u32) -> ColumnCount {
    ColumnCount::new(n).unwrap()
}

fn fixed(columns: u32, gap: f64, estimate: f64) -> LayoutConfig {
    LayoutConfig {
        gap,
        padding: 0.0,
        columns: ColumnSpec::Fixed(count(columns)),
        estimated_item_height: estimate,
    }
}

#[test]
fn breakpoints_select_column_count_by_width() {
    let spec = ColumnSpec::Responsive(vec![
        ColumnBreakpoint::new(1280.0, count(4)),
        ColumnBreakpoint::new(900.0, count(3)),
        ColumnBreakpoint::new(640.0, count(2)),
        ColumnBreakpoint::new(0.0, count(1)),
    ]);

    assert_eq!(spec.resolve(1920.0).get(), 4);
    assert_eq!(spec.resolve(1000.0).get(), 3);
    assert_eq!(spec.resolve(700.0).get(), 2);
    assert_eq!(spec.resolve(300.0).get(), 1);
}

#[test]
fn equal_heights_break_ties_towards_lowest_column() {
    let mut engine = LayoutEngine::new(400.0, fixed(2, 0.0, 100.0));
    let items = ids(5);
    let state = engine.calculate(&items, &HeightOverrides::new());

    let columns: Vec<usize> = state.ordered_positions().map(|p| p.column).collect();
    assert_eq!(columns, [0, 1, 0, 1, 0]);
    assert_eq!(state.column_heights, [300.0, 200.0]);
    assert_eq!(state.container_height, 300.0);
}

#[test]
fn width_change_waits_for_explicit_calculate() {
    let mut engine = LayoutEngine::new(400.0, fixed(2, 0.0, 100.0));
    let items = ids(2);
    engine.calculate(&items, &HeightOverrides::new());

    engine.set_container_width(800.0);
    assert_eq!(engine.state().column_width, 200.0);
    engine.calculate(&items, &HeightOverrides::new());
    assert_eq!(engine.state().column_width, 400.0);
}

#[test]
fn near_bottom_when_viewport_reaches_threshold() {
    // Fifty 100px rows in one column: max bottom 5000.
    let mut layout = LayoutEngine::new(400.0, fixed(1, 0.0, 100.0));
    let state = layout.calculate(&ids(50), &HeightOverrides::new());
    assert_eq!(state.max_bottom(), 5000.0);

    let mut engine = VirtualizationEngine::new(
        0.0,
        SchedulingConfig::default(),
        ScrollState::new(4600.0, 800.0),
    );
    engine.update(Arc::clone(&state));
    assert!(engine.is_near_bottom(500.0));
}

#[test]
fn repeated_measurement_relayouts_once() {
    let mut masonry = Masonry::builder(
        HeadlessRenderer::new(),
        TableMeasurer::new(),
        Box::new(ManualScrollSource::new(ScrollState::new(0.0, 600.0))),
        Box::new(FixedResizeSource::new(800.0)),
    )
    .items(ids(6))
    .build()
    .unwrap();

    let passes = masonry.pass_count();
    assert!(masonry.report_measured_height("item-2", 275.0));
    assert!(!masonry.report_measured_height("item-2", 275.0));
    assert_eq!(masonry.pass_count(), passes + 1);
}

#[test]
fn virtualized_materialized_set_tracks_visible_set() {
    let heights = [180.0, 260.0, 90.0, 400.0, 150.0, 320.0, 210.0, 120.0];
    let items: Vec<ItemId> = (0..64)
        .map(|i| ItemId::new(format!("item-{i}")).unwrap())
        .collect();
    let measurer: TableMeasurer = items
        .iter()
        .cloned()
        .zip(heights.iter().copied().cycle())
        .collect();

    let mut options = MasonryOptions::default();
    options.layout = fixed(3, 16.0, 200.0);
    options.virtualization.enabled = true;
    options.virtualization.overscan = 1.0;

    let mut masonry = Masonry::builder(
        HeadlessRenderer::new(),
        measurer,
        Box::new(ManualScrollSource::new(ScrollState::new(0.0, 900.0))),
        Box::new(FixedResizeSource::new(1200.0)),
    )
    .options(options)
    .items(items)
    .build()
    .unwrap();

    let now = std::time::Instant::now();
    masonry.on_paint();
    masonry.on_scroll(ScrollState::new(3000.0, 900.0), now);
    masonry.on_animation_frame();
    masonry.on_paint();

    let visible: Vec<&ItemId> = masonry.visible_items().ids().collect();
    assert_eq!(masonry.materialized_ids(), visible);
    assert!(!masonry.is_materialized("item-0"));
}

#[test]
fn layout_summary_snapshot() {
    let items = ids(6);
    let heights = [120.0, 80.0, 200.0, 50.0, 90.0, 60.0];
    let overrides: HeightOverrides = items.iter().cloned().zip(heights).collect();

    let mut engine = LayoutEngine::new(620.0, fixed(3, 10.0, 400.0));
    let state = engine.calculate(&items, &overrides);

    let mut summary = format!(
        "columns={} column_width={} container_height={}\n",
        state.column_count, state.column_width, state.container_height
    );
    for p in state.ordered_positions() {
        writeln!(
            summary,
            "{} col={} x={} y={} h={}",
            p.id, p.column, p.x, p.y, p.height
        )
        .unwrap();
    }

    insta::assert_snapshot!(summary, @r"
    columns=3 column_width=200 container_height=220
    item-0 col=0 x=0 y=0 h=120
    item-1 col=1 x=210 y=0 h=80
    item-2 col=2 x=420 y=0 h=200
    item-3 col=1 x=210 y=90 h=50
    item-4 col=0 x=0 y=130 h=90
    item-5 col=1 x=210 y=150 h=60
    ");
}
