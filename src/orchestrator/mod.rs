//! The orchestrator: owns the item list and reconciles live handles.
//!
//! One `Masonry` instance sequences every pass:
//!
//! 1. pack the items with `LayoutEngine` (measured overrides replace estimates)
//! 2. hand the snapshot to `VirtualizationEngine`
//! 3. diff the target set (visible items, or every item when virtualization
//!    is off) against the materialized handles
//!
//! Newly materialized items are measured after the next paint
//! (`on_paint`). Every measurement is kept, but only one that differs from
//! the height already on record triggers a relayout, which is what stops the
//! materialize → measure → relayout loop from feeding itself.
//!
//! All timing comes from the host as explicit `Instant`s; see `on_scroll`,
//! `on_resize`, `tick`, `on_animation_frame` and `on_paint`.

pub mod collaborators;
pub mod load_more;
pub mod transition;

pub use collaborators::{Measurer, Renderer, ResizeSource, ScrollSource, Subscription};
pub use load_more::{LoadGate, LoadGuard};
pub use transition::Transition;

use crate::config::{MasonryOptions, OptionsPatch};
use crate::layout::{HeightOverrides, ItemPosition, LayoutEngine, LayoutState};
use crate::model::{ItemId, MasonryError, MasonryItem};
use crate::virtualization::{
    Debounce, ScrollBehavior, ScrollDirection, ScrollState, VirtualizationEngine,
    VisibilityUpdate, VisibleItem, VisibleSet,
};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Receives the ordered positions after every pass.
pub type LayoutCallback = Box<dyn FnMut(&[ItemPosition]) + Send>;

/// A `Masonry` behind one mutex, for hosts with more than one thread.
pub type SharedMasonry<I, R, M> = Arc<Mutex<Masonry<I, R, M>>>;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Process-unique id of a `Masonry` instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }

    /// Numeric value of the id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "masonry-{}", self.0)
    }
}

/// Builder for [`Masonry`].
pub struct MasonryBuilder<I, R, M> {
    renderer: R,
    measurer: M,
    scroll_source: Box<dyn ScrollSource>,
    resize_source: Box<dyn ResizeSource>,
    options: MasonryOptions,
    items: Vec<I>,
    on_layout_complete: Option<LayoutCallback>,
}

impl<I, R, M> MasonryBuilder<I, R, M>
where
    I: MasonryItem,
    R: Renderer<I>,
    M: Measurer<R::Handle>,
{
    /// Replace the default options.
    pub fn options(mut self, options: MasonryOptions) -> Self {
        self.options = options;
        self
    }

    /// Initial items, in authoritative order.
    pub fn items(mut self, items: Vec<I>) -> Self {
        self.items = items;
        self
    }

    /// Call `callback` with the ordered positions after every pass.
    pub fn on_layout_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[ItemPosition]) + Send + 'static,
    {
        self.on_layout_complete = Some(Box::new(callback));
        self
    }

    /// Resolve the container and run the first pass.
    ///
    /// # Errors
    ///
    /// `MasonryError::ContainerNotFound` if the resize source has no container.
    pub fn build(self) -> Result<Masonry<I, R, M>, MasonryError> {
        let width = self
            .resize_source
            .container_width()
            .ok_or(MasonryError::ContainerNotFound)?;

        let scroll = self.scroll_source.scroll_state();
        let layout = LayoutEngine::new(width, self.options.layout.clone());
        let virtualization = VirtualizationEngine::new(
            self.options.overscan_px(),
            self.options.scheduling,
            scroll,
        );

        let mut masonry = Masonry {
            instance_id: InstanceId::next(),
            resize: Debounce::new(self.options.scheduling.resize_debounce),
            options: self.options,
            items: Vec::new(),
            known: HashSet::new(),
            overrides: HeightOverrides::new(),
            layout,
            virtualization,
            materialized: HashMap::new(),
            pending_measure: Vec::new(),
            renderer: self.renderer,
            measurer: self.measurer,
            scroll_source: self.scroll_source,
            resize_source: self.resize_source,
            pending_width: None,
            gate: LoadGate::new(),
            loading_shown: false,
            empty_shown: false,
            on_layout_complete: self.on_layout_complete,
            pass_count: 0,
            destroyed: false,
        };

        info!(
            instance = %masonry.instance_id,
            items = self.items.len(),
            container_width = width,
            "Masonry initialized"
        );

        masonry.extend_items(self.items);
        masonry.layout_pass();
        Ok(masonry)
    }
}

/// Orchestrates layout, virtualization and materialization for one container.
///
/// # Invariants
/// - item ids are unique; the first occurrence wins
/// - with virtualization enabled, after any pass or frame the materialized
///   ids equal the visible ids
/// - with virtualization disabled, every item is materialized after a pass
/// - the height overrides only hold ids of current items
pub struct Masonry<I, R, M>
where
    I: MasonryItem,
    R: Renderer<I>,
    M: Measurer<R::Handle>,
{
    instance_id: InstanceId,
    options: MasonryOptions,
    items: Vec<I>,
    known: HashSet<ItemId>,
    overrides: HeightOverrides,
    layout: LayoutEngine,
    virtualization: VirtualizationEngine,
    materialized: HashMap<ItemId, R::Handle>,
    /// Materialized since the last paint; measured in `on_paint`.
    pending_measure: Vec<ItemId>,
    renderer: R,
    measurer: M,
    scroll_source: Box<dyn ScrollSource>,
    resize_source: Box<dyn ResizeSource>,
    resize: Debounce,
    pending_width: Option<f64>,
    gate: LoadGate,
    loading_shown: bool,
    empty_shown: bool,
    on_layout_complete: Option<LayoutCallback>,
    pass_count: u64,
    destroyed: bool,
}

impl<I, R, M> Masonry<I, R, M>
where
    I: MasonryItem,
    R: Renderer<I>,
    M: Measurer<R::Handle>,
{
    /// Start building an instance wired to its collaborators.
    pub fn builder(
        renderer: R,
        measurer: M,
        scroll_source: Box<dyn ScrollSource>,
        resize_source: Box<dyn ResizeSource>,
    ) -> MasonryBuilder<I, R, M> {
        MasonryBuilder {
            renderer,
            measurer,
            scroll_source,
            resize_source,
            options: MasonryOptions::default(),
            items: Vec::new(),
            on_layout_complete: None,
        }
    }

    /// Wrap the instance for use from several threads.
    pub fn into_shared(self) -> SharedMasonry<I, R, M> {
        Arc::new(Mutex::new(self))
    }

    /// Process-unique id, also attached to log events.
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    /// Current merged options.
    pub fn options(&self) -> &MasonryOptions {
        &self.options
    }

    /// True once [`Masonry::destroy`] has run.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ensure_live(&self, operation: &str) -> bool {
        if self.destroyed {
            warn!(instance = %self.instance_id, operation, "Ignoring call on destroyed Masonry");
        }
        !self.destroyed
    }

    // ---------------------------------------------------------------
    // Items
    // ---------------------------------------------------------------

    /// Append items whose ids are not already present.
    fn extend_items(&mut self, items: Vec<I>) -> usize {
        let mut added = 0;
        for item in items {
            if self.known.contains(item.id()) {
                warn!(instance = %self.instance_id, id = %item.id(), "Skipping duplicate item id");
                continue;
            }
            self.known.insert(item.id().clone());
            self.items.push(item);
            added += 1;
        }
        added
    }

    /// Append items and run a pass.
    pub fn add_items(&mut self, items: Vec<I>) {
        if !self.ensure_live("add_items") {
            return;
        }
        let added = self.extend_items(items);
        debug!(instance = %self.instance_id, added, total = self.items.len(), "Added items");
        self.layout_pass();
        self.sync_loading_indicator();
    }

    /// Replace every item. Releases all handles and forgets all measurements.
    pub fn set_items(&mut self, items: Vec<I>) {
        if !self.ensure_live("set_items") {
            return;
        }
        self.release_all();
        self.overrides.clear();
        self.items.clear();
        self.known.clear();
        self.extend_items(items);
        debug!(instance = %self.instance_id, total = self.items.len(), "Set items");
        self.layout_pass();
        self.sync_loading_indicator();
    }

    /// Remove one item. Returns `false` if the id is unknown.
    pub fn remove_item(&mut self, id: &str) -> bool {
        if !self.ensure_live("remove_item") {
            return false;
        }
        let Some(index) = self.items.iter().position(|item| item.id().as_str() == id) else {
            return false;
        };

        if let Some(handle) = self.materialized.remove(id) {
            self.renderer.remove(handle);
        }
        self.pending_measure.retain(|pending| pending.as_str() != id);
        self.overrides.remove(id);
        self.known.remove(id);
        self.items.remove(index);

        debug!(instance = %self.instance_id, id, "Removed item");
        self.layout_pass();
        true
    }

    /// Items in authoritative order.
    pub fn items(&self) -> &[I] {
        &self.items
    }

    // ---------------------------------------------------------------
    // Options
    // ---------------------------------------------------------------

    /// Merge `patch` into the options and run a pass.
    pub fn set_options(&mut self, patch: &OptionsPatch) {
        if !self.ensure_live("set_options") {
            return;
        }
        self.options.apply_patch(patch);
        self.renderer.set_options(&self.options);

        self.layout.set_config(self.options.layout.clone());
        self.virtualization.set_overscan_px(self.options.overscan_px());
        self.virtualization.set_scheduling(self.options.scheduling);
        self.resize.set_delay(self.options.scheduling.resize_debounce);

        debug!(
            instance = %self.instance_id,
            layout_changed = patch.touches_layout(),
            virtualize = self.options.virtualization.enabled,
            "Options updated"
        );
        self.layout_pass();
    }

    // ---------------------------------------------------------------
    // Passes
    // ---------------------------------------------------------------

    /// Clear every measured height and run a pass.
    ///
    /// Live items are measured again after the next paint.
    pub fn refresh(&mut self) {
        if !self.ensure_live("refresh") {
            return;
        }
        self.overrides.clear();
        self.pending_measure = self
            .items
            .iter()
            .map(|item| item.id())
            .filter(|id| self.materialized.contains_key(id.as_str()))
            .cloned()
            .collect();
        self.layout_pass();
    }

    fn layout_pass(&mut self) {
        if self.items.is_empty() {
            self.empty_pass();
            return;
        }
        if self.empty_shown {
            self.renderer.show_empty_state(None);
            self.empty_shown = false;
        }

        let state = self
            .layout
            .calculate(self.items.iter().map(|item| item.id()), &self.overrides);
        self.renderer.set_container_height(state.container_height);
        self.renderer.set_css_variables(&self.layout.css_variables());
        self.virtualization.update(Arc::clone(&state));

        let transition = if self.virtualization.is_scrolling() {
            None
        } else {
            Transition::from_config(&self.options.animation)
        };
        self.reconcile(true, transition.as_ref());

        self.pass_count += 1;
        debug!(
            instance = %self.instance_id,
            items = state.len(),
            columns = state.column_count.get(),
            container_height = state.container_height,
            materialized = self.materialized.len(),
            "Layout pass"
        );
        self.notify_layout_complete(&state);
    }

    fn empty_pass(&mut self) {
        let state = self.layout.reset();
        self.virtualization.update(Arc::clone(&state));
        self.release_all();

        self.renderer.set_container_height(0.0);
        self.renderer.set_css_variables(&self.layout.css_variables());
        if !self.empty_shown {
            self.renderer
                .show_empty_state(Some(self.options.empty_message.as_str()));
            self.empty_shown = true;
        }

        self.pass_count += 1;
        debug!(instance = %self.instance_id, "Empty layout pass");
        self.notify_layout_complete(&state);
    }

    fn notify_layout_complete(&mut self, state: &LayoutState) {
        if let Some(callback) = self.on_layout_complete.as_mut() {
            let positions: Vec<ItemPosition> = state.ordered_positions().cloned().collect();
            callback(&positions);
        }
    }

    /// Diff the target set against the materialized handles.
    ///
    /// On a layout pass (`moved`) every retained handle gets its new
    /// position; frame-driven reconciles only add and remove.
    fn reconcile(&mut self, moved: bool, transition: Option<&Transition>) {
        let targets: Vec<VisibleItem> = if self.options.virtualization.enabled {
            self.virtualization.visible_items().as_slice().to_vec()
        } else {
            self.virtualization.all_items()
        };

        let keep: HashSet<&str> = targets.iter().map(|target| target.id.as_str()).collect();
        let departed: Vec<ItemId> = self
            .materialized
            .keys()
            .filter(|id| !keep.contains(id.as_str()))
            .cloned()
            .collect();
        for id in &departed {
            if let Some(handle) = self.materialized.remove(id.as_str()) {
                self.renderer.remove(handle);
            }
        }
        self.pending_measure
            .retain(|id| !departed.iter().any(|gone| gone == id));

        let mut created = 0usize;
        for target in &targets {
            if let Some(handle) = self.materialized.get_mut(target.id.as_str()) {
                if moved {
                    self.renderer
                        .update_position(handle, &target.position, transition);
                }
                continue;
            }
            let Some(item) = self
                .items
                .get(target.index)
                .filter(|item| item.id() == &target.id)
            else {
                warn!(instance = %self.instance_id, id = %target.id, "Visible id has no item");
                continue;
            };
            let handle = self.renderer.render(item, &target.position);
            self.materialized.insert(target.id.clone(), handle);
            self.pending_measure.push(target.id.clone());
            created += 1;
        }

        if created > 0 || !departed.is_empty() {
            debug!(
                instance = %self.instance_id,
                created,
                removed = departed.len(),
                live = self.materialized.len(),
                "Reconciled materialized set"
            );
        }
    }

    fn release_all(&mut self) {
        for (_, handle) in self.materialized.drain() {
            self.renderer.remove(handle);
        }
        self.pending_measure.clear();
    }

    // ---------------------------------------------------------------
    // Measurement
    // ---------------------------------------------------------------

    /// Record a measured height. Returns `true` if the packed height changes.
    ///
    /// The value is always stored, even when it equals the estimate it was
    /// packed with, so a later change of `estimated_item_height` cannot
    /// replace a known height.
    fn record_measurement(&mut self, id: &ItemId, height: f64) -> bool {
        if !height.is_finite() || height < 0.0 {
            warn!(instance = %self.instance_id, id = %id, height, "Ignoring invalid measured height");
            return false;
        }
        if !self.known.contains(id) {
            return false;
        }
        let on_record = self
            .overrides
            .get(id.as_str())
            .or_else(|| self.layout.position(id.as_str()).map(|p| p.height));
        self.overrides.record(id.clone(), height);
        on_record != Some(height)
    }

    /// Measure items materialized since the last paint.
    ///
    /// Runs at most one relayout no matter how many heights changed.
    /// Returns `true` if a relayout ran.
    pub fn on_paint(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let pending = std::mem::take(&mut self.pending_measure);
        let mut changed = 0usize;
        for id in &pending {
            let Some(handle) = self.materialized.get(id.as_str()) else {
                continue;
            };
            let height = self.measurer.measure(handle);
            if self.record_measurement(id, height) {
                changed += 1;
            }
        }
        if changed == 0 {
            return false;
        }
        debug!(instance = %self.instance_id, changed, "Measured heights changed, relayout");
        self.layout_pass();
        true
    }

    /// Feed one measured height from outside the paint cycle.
    ///
    /// Returns `true` if the value differed from the one on record and a
    /// relayout ran.
    pub fn report_measured_height(&mut self, id: &str, height: f64) -> bool {
        if !self.ensure_live("report_measured_height") {
            return false;
        }
        let Some(id) = self.known.get(id).cloned() else {
            return false;
        };
        if !self.record_measurement(&id, height) {
            return false;
        }
        self.layout_pass();
        true
    }

    /// Measured heights on record.
    pub fn height_overrides(&self) -> &HeightOverrides {
        &self.overrides
    }

    // ---------------------------------------------------------------
    // Host events
    // ---------------------------------------------------------------

    /// Scroll notification from the scroll source.
    pub fn on_scroll(&mut self, state: ScrollState, now: Instant) {
        if self.destroyed {
            return;
        }
        self.virtualization.handle_scroll(state, now);
    }

    /// Resize notification; applied once the debounce window passes.
    pub fn on_resize(&mut self, width: f64, now: Instant) {
        if self.destroyed {
            return;
        }
        self.pending_width = Some(width);
        self.resize.trigger(now);
    }

    /// Fire due timers.
    pub fn tick(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }
        self.virtualization.tick(now);

        if self.resize.poll(now) {
            if let Some(width) = self.pending_width.take() {
                self.apply_resize(width);
            }
        }
        self.sync_loading_indicator();
    }

    fn apply_resize(&mut self, width: f64) {
        if width == self.layout.container_width() {
            debug!(instance = %self.instance_id, width, "Resize to same width, skipping pass");
            return;
        }
        debug!(instance = %self.instance_id, width, "Container resized");
        self.layout.set_container_width(width);
        self.layout_pass();
    }

    /// Run the pending visible-set recompute.
    ///
    /// Returns `true` if the materialized set was reconciled.
    pub fn on_animation_frame(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        match self.virtualization.on_animation_frame() {
            Some(VisibilityUpdate::Changed) if self.options.virtualization.enabled => {
                self.reconcile(false, None);
                true
            }
            _ => false,
        }
    }

    /// True between the first scroll event and the end of the quiet window.
    pub fn is_scrolling(&self) -> bool {
        self.virtualization.is_scrolling()
    }

    /// True if a visible-set recompute waits for the next frame.
    pub fn frame_pending(&self) -> bool {
        self.virtualization.frame_pending()
    }

    // ---------------------------------------------------------------
    // Load more
    // ---------------------------------------------------------------

    /// Near the bottom and no load in flight.
    pub fn wants_load_more(&self) -> bool {
        !self.destroyed
            && !self.gate.is_loading()
            && self
                .virtualization
                .is_near_bottom(self.options.load_more_threshold)
    }

    /// Take the load gate and show the loading indicator.
    ///
    /// Hand the guard back through [`Masonry::end_load_more`] once the load
    /// settles, whatever its outcome.
    pub fn begin_load_more(&mut self) -> Option<LoadGuard> {
        if !self.ensure_live("begin_load_more") {
            return None;
        }
        let guard = self.gate.try_begin()?;
        self.sync_loading_indicator();
        Some(guard)
    }

    /// Release the gate and hide the loading indicator.
    pub fn end_load_more(&mut self, guard: LoadGuard) {
        drop(guard);
        if !self.destroyed {
            self.sync_loading_indicator();
        }
    }

    /// Run `load` between [`Masonry::begin_load_more`] and
    /// [`Masonry::end_load_more`].
    ///
    /// Returns `None` without polling `load` if a load is already in flight.
    /// The indicator is hidden as soon as `load` completes, successful or not.
    pub async fn load_more<F>(&mut self, load: F) -> Option<F::Output>
    where
        F: Future,
    {
        let guard = self.begin_load_more()?;
        let output = load.await;
        self.end_load_more(guard);
        Some(output)
    }

    /// A handle to the load gate for use outside the instance lock.
    ///
    /// Loads run through a clone bypass the renderer; the indicator follows
    /// the gate on the next `tick`.
    pub fn load_gate(&self) -> LoadGate {
        self.gate.clone()
    }

    /// True while a load-more holds the gate.
    pub fn is_loading(&self) -> bool {
        self.gate.is_loading()
    }

    fn sync_loading_indicator(&mut self) {
        let show = self.options.show_loading && self.gate.is_loading();
        if show != self.loading_shown {
            self.renderer.show_loading(show);
            self.loading_shown = show;
        }
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Snapshot of the last pass.
    pub fn layout_state(&self) -> Arc<LayoutState> {
        self.layout.state()
    }

    /// Position of `id` in the last pass.
    pub fn position(&self, id: &str) -> Option<&ItemPosition> {
        self.layout.position(id)
    }

    /// Visible set of the last computation.
    pub fn visible_items(&self) -> &VisibleSet {
        self.virtualization.visible_items()
    }

    /// Every item with its position, in item order.
    pub fn all_items(&self) -> Vec<VisibleItem> {
        self.virtualization.all_items()
    }

    /// True within `load_more_threshold` of the bottom.
    pub fn is_near_bottom(&self) -> bool {
        self.virtualization
            .is_near_bottom(self.options.load_more_threshold)
    }

    /// Scroll direction since the last visible-set computation.
    pub fn scroll_direction(&self) -> ScrollDirection {
        self.virtualization.scroll_direction()
    }

    /// Original indices of the visible items, end exclusive.
    pub fn render_range(&self) -> Range<usize> {
        self.virtualization.render_range()
    }

    /// Scroll to the stored `y` of `id`. Returns `false` for unknown ids.
    pub fn scroll_to_item(&mut self, id: &str, behavior: ScrollBehavior) -> bool {
        if !self.ensure_live("scroll_to_item") {
            return false;
        }
        self.virtualization
            .scroll_to_item(id, behavior, self.scroll_source.as_mut())
    }

    /// True if `id` has a live handle.
    pub fn is_materialized(&self, id: &str) -> bool {
        self.materialized.contains_key(id)
    }

    /// Materialized ids in item order.
    pub fn materialized_ids(&self) -> Vec<&ItemId> {
        self.items
            .iter()
            .map(|item| item.id())
            .filter(|id| self.materialized.contains_key(id.as_str()))
            .collect()
    }

    /// Number of live handles.
    pub fn materialized_count(&self) -> usize {
        self.materialized.len()
    }

    /// Completed passes, including the initial one.
    pub fn pass_count(&self) -> u64 {
        self.pass_count
    }

    /// The renderer collaborator.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    // ---------------------------------------------------------------
    // Teardown
    // ---------------------------------------------------------------

    /// Release every handle and unsubscribe from both event sources.
    ///
    /// Idempotent. Later calls to mutating operations are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.release_all();
        self.scroll_source.unsubscribe();
        self.resize_source.unsubscribe();
        self.virtualization.cancel_pending();
        self.resize.cancel();
        self.pending_width = None;

        if self.empty_shown {
            self.renderer.show_empty_state(None);
            self.empty_shown = false;
        }
        if self.loading_shown {
            self.renderer.show_loading(false);
            self.loading_shown = false;
        }

        self.destroyed = true;
        info!(instance = %self.instance_id, "Masonry destroyed");
    }
}

impl<I, R, M> Drop for Masonry<I, R, M>
where
    I: MasonryItem,
    R: Renderer<I>,
    M: Measurer<R::Handle>,
{
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<I, R, M> fmt::Debug for Masonry<I, R, M>
where
    I: MasonryItem,
    R: Renderer<I>,
    M: Measurer<R::Handle>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Masonry")
            .field("instance_id", &self.instance_id)
            .field("items", &self.items.len())
            .field("materialized", &self.materialized.len())
            .field("pass_count", &self.pass_count)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
