//! Scripted headless sessions.
//!
//! Feeds a fixed sequence of host events into a `Masonry` wired to the
//! headless collaborators and reports what happened. Each item carries the
//! height the measurer reports once it has been painted, so the report shows
//! the layout after the measurement feedback has settled.

use crate::config::MasonryOptions;
use crate::headless::{FixedResizeSource, HeadlessRenderer, ManualScrollSource, TableMeasurer};
use crate::layout::ItemPosition;
use crate::model::{ItemId, MasonryError, MasonryItem};
use crate::orchestrator::{Masonry, Measurer, Renderer};
use crate::virtualization::{ScrollDirection, ScrollState};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Errors from loading or running a script.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The items file could not be read.
    #[error("Failed to read items from {path:?}: {source}")]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The items file is not a JSON array of items.
    #[error("Invalid items JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Container widths must be positive and finite.
    #[error("Invalid container width: {0}")]
    InvalidWidth(f64),

    /// The instance could not be built.
    #[error(transparent)]
    Masonry(#[from] MasonryError),
}

/// An item with the height it measures as once painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimItem {
    /// Stable identifier.
    pub id: ItemId,
    /// Height reported once painted (px).
    pub height: f64,
}

impl MasonryItem for SimItem {
    fn id(&self) -> &ItemId {
        &self.id
    }
}

/// Read a JSON array of `{ "id": ..., "height": ... }` objects.
pub fn load_items(path: &Path) -> Result<Vec<SimItem>, SimulationError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SimulationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// Inputs of one scripted session.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// Items in authoritative order.
    pub items: Vec<SimItem>,
    /// Container width (px).
    pub container_width: f64,
    /// Viewport height (px).
    pub viewport_height: f64,
    /// Scroll offsets visited in order, one gesture each.
    pub scroll_steps: Vec<f64>,
}

/// State observed after one scroll step has settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// Scroll offset of this step.
    pub scroll_top: f64,
    /// Direction relative to the previous computation.
    pub direction: ScrollDirection,
    /// Visible ids in item order.
    pub visible: Vec<ItemId>,
    /// Original indices of the visible items.
    pub render_range: Range<usize>,
    /// Live handles after the step.
    pub materialized: usize,
    /// Whether a load-more would fire here.
    pub near_bottom: bool,
}

/// Renderer activity over the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Items rendered.
    pub renders: usize,
    /// Position updates of live items.
    pub updates: usize,
    /// Handles released.
    pub removals: usize,
}

/// Outcome of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Columns of the final layout.
    pub column_count: u32,
    /// Column width of the final layout (px).
    pub column_width: f64,
    /// Container height of the final layout (px).
    pub container_height: f64,
    /// Final positions in item order.
    pub positions: Vec<ItemPosition>,
    /// Visible ids before the first scroll step.
    pub initially_visible: Vec<ItemId>,
    /// One report per scroll step.
    pub steps: Vec<StepReport>,
    /// Ids still materialized at the end, in item order.
    pub materialized: Vec<ItemId>,
    /// Layout passes, including the initial one.
    pub passes: u64,
    /// Renderer activity.
    pub render_stats: RenderStats,
}

/// Paint until measurements stop changing the layout.
///
/// Gives up after `items + 1` rounds.
fn settle<I, R, M>(masonry: &mut Masonry<I, R, M>)
where
    I: MasonryItem,
    R: Renderer<I>,
    M: Measurer<R::Handle>,
{
    let limit = masonry.items().len() + 1;
    for round in 0..limit {
        if !masonry.on_paint() {
            debug!(rounds = round, "Layout settled");
            return;
        }
    }
}

fn visible_ids<I, R, M>(masonry: &Masonry<I, R, M>) -> Vec<ItemId>
where
    I: MasonryItem,
    R: Renderer<I>,
    M: Measurer<R::Handle>,
{
    masonry.visible_items().ids().cloned().collect()
}

/// Run `script` with `options` against the headless collaborators.
///
/// # Errors
///
/// `InvalidWidth` for a non-positive or non-finite container width.
pub fn run(script: Script, options: MasonryOptions) -> Result<SimulationReport, SimulationError> {
    let width = script.container_width;
    if !(width.is_finite() && width > 0.0) {
        return Err(SimulationError::InvalidWidth(width));
    }

    let measurer: TableMeasurer = script
        .items
        .iter()
        .map(|item| (item.id.clone(), item.height))
        .collect();
    let renderer = HeadlessRenderer::new();
    let record = renderer.record();
    let scroll = ManualScrollSource::new(ScrollState::new(0.0, script.viewport_height));
    let gesture = options.scheduling.scroll_quiet.max(options.scheduling.scroll_throttle);

    let mut masonry = Masonry::builder(
        renderer,
        measurer,
        Box::new(scroll.clone()),
        Box::new(FixedResizeSource::new(width)),
    )
    .options(options)
    .items(script.items)
    .build()?;
    settle(&mut masonry);
    let initially_visible = visible_ids(&masonry);

    let mut clock = Instant::now();
    let mut steps = Vec::with_capacity(script.scroll_steps.len());
    for top in script.scroll_steps {
        let state = ScrollState::new(top, script.viewport_height);
        scroll.set_state(state);
        masonry.on_scroll(state, clock);
        let direction = masonry.scroll_direction();
        masonry.on_animation_frame();
        settle(&mut masonry);

        clock += gesture;
        masonry.tick(clock);

        steps.push(StepReport {
            scroll_top: top,
            direction,
            visible: visible_ids(&masonry),
            render_range: masonry.render_range(),
            materialized: masonry.materialized_count(),
            near_bottom: masonry.is_near_bottom(),
        });
    }

    let state = masonry.layout_state();
    let render_stats = {
        let record = record.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        RenderStats {
            renders: record.renders(),
            updates: record.updates(),
            removals: record.removals(),
        }
    };

    Ok(SimulationReport {
        column_count: state.column_count.get(),
        column_width: state.column_width,
        container_height: state.container_height,
        positions: state.ordered_positions().cloned().collect(),
        initially_visible,
        steps,
        materialized: masonry.materialized_ids().into_iter().cloned().collect(),
        passes: masonry.pass_count(),
        render_stats,
    })
}
