//! Scroll culling over the latest layout snapshot.

use super::scheduler::{Debounce, FrameScheduler, Throttle};
use super::scroll::{ScrollBehavior, ScrollDirection, ScrollState};
use super::visible_set::{VisibilityUpdate, VisibleItem, VisibleSet};
use crate::config::SchedulingConfig;
use crate::layout::{ItemPosition, LayoutState};
use crate::orchestrator::ScrollSource;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tracing::trace;

/// `true` if `[y, y + height]` intersects `[low, high]`.
fn intersects(position: &ItemPosition, low: f64, high: f64) -> bool {
    position.bottom() >= low && position.y <= high
}

/// Derives the visible subset of a layout from scroll state.
///
/// Scroll events are throttled and coalesced into at most one pending
/// recompute, which the host runs from `on_animation_frame`. Direct calls to
/// `calculate_visible_items` bypass the scheduler.
#[derive(Debug)]
pub struct VirtualizationEngine {
    layout: Arc<LayoutState>,
    scroll: ScrollState,
    /// Scroll top used by the last visible-set computation.
    last_computed_top: f64,
    overscan_px: f64,
    visible: VisibleSet,
    frame: FrameScheduler,
    throttle: Throttle,
    quiet: Debounce,
    scrolling: bool,
}

impl VirtualizationEngine {
    /// Engine over an empty layout.
    pub fn new(overscan_px: f64, scheduling: SchedulingConfig, scroll: ScrollState) -> Self {
        Self {
            layout: Arc::new(LayoutState::default()),
            scroll,
            last_computed_top: scroll.scroll_top,
            overscan_px,
            visible: VisibleSet::new(),
            frame: FrameScheduler::new(),
            throttle: Throttle::new(scheduling.scroll_throttle),
            quiet: Debounce::new(scheduling.scroll_quiet),
            scrolling: false,
        }
    }

    /// Set the overscan margin (px). Takes effect on the next computation.
    pub fn set_overscan_px(&mut self, overscan_px: f64) {
        self.overscan_px = overscan_px;
    }

    /// Overscan margin (px).
    pub fn overscan_px(&self) -> f64 {
        self.overscan_px
    }

    /// Apply new throttle and quiet intervals.
    pub fn set_scheduling(&mut self, scheduling: SchedulingConfig) {
        self.throttle.set_interval(scheduling.scroll_throttle);
        self.quiet.set_delay(scheduling.scroll_quiet);
    }

    /// Adopt a new layout snapshot and recompute immediately.
    pub fn update(&mut self, layout: Arc<LayoutState>) -> VisibilityUpdate {
        self.layout = layout;
        self.calculate_visible_items()
    }

    /// Layout snapshot the visible set is computed from.
    pub fn layout(&self) -> &Arc<LayoutState> {
        &self.layout
    }

    /// Record scroll state without scheduling anything.
    pub fn set_scroll_state(&mut self, scroll: ScrollState) {
        self.scroll = scroll;
    }

    /// Last recorded scroll state.
    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    /// Recompute the visible set from the current layout and scroll state.
    ///
    /// Returns `Unchanged` when the ids and their order match the previous
    /// set; the stored positions are refreshed either way.
    pub fn calculate_visible_items(&mut self) -> VisibilityUpdate {
        let low = self.scroll.scroll_top - self.overscan_px;
        let high = self.scroll.viewport_bottom() + self.overscan_px;

        let items = self
            .layout
            .order
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let position = self.layout.position(id.as_str())?;
                intersects(position, low, high).then(|| VisibleItem {
                    index,
                    id: id.clone(),
                    position: position.clone(),
                })
            })
            .collect();
        let next = VisibleSet::from_items(items);

        self.last_computed_top = self.scroll.scroll_top;
        let update = if next.same_members(&self.visible) {
            VisibilityUpdate::Unchanged
        } else {
            VisibilityUpdate::Changed
        };
        trace!(
            visible = next.len(),
            changed = update.is_changed(),
            "Computed visible set"
        );
        self.visible = next;
        update
    }

    /// Feed a scroll event.
    ///
    /// Raises the scrolling flag, restarts the quiet timer and, if the
    /// throttle admits it, requests a frame. Returns `true` if a frame was
    /// newly scheduled by this call.
    pub fn handle_scroll(&mut self, scroll: ScrollState, now: Instant) -> bool {
        self.scroll = scroll;
        self.scrolling = true;
        self.quiet.trigger(now);
        self.throttle.admit(now) && self.frame.request()
    }

    /// Fire due timers: the trailing throttle edge and the quiet window.
    pub fn tick(&mut self, now: Instant) {
        if self.throttle.poll_trailing(now) {
            self.frame.request();
        }
        if self.quiet.poll(now) {
            self.scrolling = false;
        }
    }

    /// Run the pending recompute, if one was scheduled.
    pub fn on_animation_frame(&mut self) -> Option<VisibilityUpdate> {
        self.frame
            .take()
            .then(|| self.calculate_visible_items())
    }

    /// True if a recompute waits for the next frame.
    pub fn frame_pending(&self) -> bool {
        self.frame.is_pending()
    }

    /// The frame guard, for inspecting coalescing.
    pub fn frame_scheduler(&self) -> &FrameScheduler {
        &self.frame
    }

    /// Drop pending frame and timers.
    pub fn cancel_pending(&mut self) {
        self.frame.cancel();
        self.throttle.cancel();
        self.quiet.cancel();
        self.scrolling = false;
    }

    /// True between the first scroll event and the end of the quiet window.
    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    /// Visible set of the last computation.
    pub fn visible_items(&self) -> &VisibleSet {
        &self.visible
    }

    /// Every laid out item with its position, in item order.
    pub fn all_items(&self) -> Vec<VisibleItem> {
        self.layout
            .order
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                self.layout.position(id.as_str()).map(|position| VisibleItem {
                    index,
                    id: id.clone(),
                    position: position.clone(),
                })
            })
            .collect()
    }

    /// `scroll_top + viewport_height >= max item bottom - threshold`.
    pub fn is_near_bottom(&self, threshold: f64) -> bool {
        self.scroll.viewport_bottom() >= self.layout.max_bottom() - threshold
    }

    /// Direction relative to the scroll top of the last computation.
    pub fn scroll_direction(&self) -> ScrollDirection {
        let top = self.scroll.scroll_top;
        if top > self.last_computed_top {
            ScrollDirection::Down
        } else if top < self.last_computed_top {
            ScrollDirection::Up
        } else {
            ScrollDirection::None
        }
    }

    /// Ask `source` to scroll to the stored `y` of `id`.
    ///
    /// Returns `false` without touching the source if the id has no position.
    pub fn scroll_to_item(
        &self,
        id: &str,
        behavior: ScrollBehavior,
        source: &mut dyn ScrollSource,
    ) -> bool {
        match self.layout.position(id) {
            Some(position) => {
                source.scroll_to(position.y, behavior);
                true
            }
            None => false,
        }
    }

    /// Index range of the visible items, end exclusive.
    pub fn render_range(&self) -> Range<usize> {
        self.visible.index_range()
    }
}
