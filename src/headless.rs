//! In-memory collaborators.
//!
//! Every double keeps its state behind an `Arc<Mutex<_>>` so a clone kept by
//! the caller observes everything the `Masonry` instance does with its own copy.
//! They are the test doubles of this crate and the backend of `masonry-sim`.

use crate::config::MasonryOptions;
use crate::layout::{CssVariables, ItemPosition};
use crate::model::{ItemId, MasonryItem};
use crate::orchestrator::{Measurer, Renderer, ResizeSource, ScrollSource, Subscription, Transition};
use crate::virtualization::{ScrollBehavior, ScrollState};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One call made on a [`HeadlessRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    /// `Renderer::render` created a handle.
    Render {
        /// Item rendered.
        id: ItemId,
        /// Initial position.
        position: ItemPosition,
    },
    /// `Renderer::update_position` moved a live handle.
    Update {
        /// Item moved.
        id: ItemId,
        /// New position.
        position: ItemPosition,
        /// Transition requested for the move, if any.
        transition: Option<Transition>,
    },
    /// `Renderer::remove` released a handle.
    Remove {
        /// Item released.
        id: ItemId,
    },
    /// Container height pushed after a pass.
    ContainerHeight(f64),
    /// Column geometry pushed after a pass.
    CssVariables(CssVariables),
    /// Empty-state indicator shown with a message, or hidden.
    EmptyState(Option<String>),
    /// Loading indicator shown or hidden.
    Loading(bool),
    /// Merged options handed over by `set_options`.
    Options,
}

/// Everything a [`HeadlessRenderer`] has been asked to do.
#[derive(Debug, Clone, Default)]
pub struct RenderRecord {
    /// Every call, oldest first.
    pub events: Vec<RenderEvent>,
    /// Live handles by id with their latest position.
    pub live: HashMap<ItemId, ItemPosition>,
    /// Latest container height.
    pub container_height: f64,
    /// Latest column geometry.
    pub css_variables: Option<CssVariables>,
    /// Message of the visible empty-state indicator.
    pub empty_message: Option<String>,
    /// Whether the loading indicator is showing.
    pub loading: bool,
    /// Options from the last `set_options`.
    pub options: Option<MasonryOptions>,
}

impl RenderRecord {
    fn count(&self, predicate: impl Fn(&RenderEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }

    /// Number of `render` calls.
    pub fn renders(&self) -> usize {
        self.count(|event| matches!(event, RenderEvent::Render { .. }))
    }

    /// Number of `update_position` calls.
    pub fn updates(&self) -> usize {
        self.count(|event| matches!(event, RenderEvent::Update { .. }))
    }

    /// Number of `update_position` calls that carried a transition.
    pub fn animated_updates(&self) -> usize {
        self.count(|event| {
            matches!(
                event,
                RenderEvent::Update {
                    transition: Some(_),
                    ..
                }
            )
        })
    }

    /// Number of `remove` calls.
    pub fn removals(&self) -> usize {
        self.count(|event| matches!(event, RenderEvent::Remove { .. }))
    }

    /// Forget recorded events, keeping the live state.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

/// Handle produced by [`HeadlessRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessHandle {
    /// Item the handle renders.
    pub id: ItemId,
    /// Render order, starting at 1.
    pub serial: u64,
    /// Position at render time, or after the last update.
    pub position: ItemPosition,
}

/// Renderer that records calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    record: Arc<Mutex<RenderRecord>>,
    serial: u64,
}

impl HeadlessRenderer {
    /// Renderer with an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the record.
    pub fn record(&self) -> Arc<Mutex<RenderRecord>> {
        Arc::clone(&self.record)
    }

    /// Copy of the record as it is now.
    pub fn snapshot(&self) -> RenderRecord {
        lock(&self.record).clone()
    }
}

impl<I: MasonryItem> Renderer<I> for HeadlessRenderer {
    type Handle = HeadlessHandle;

    fn render(&mut self, item: &I, position: &ItemPosition) -> HeadlessHandle {
        self.serial += 1;
        let id = item.id().clone();
        let mut record = lock(&self.record);
        record.live.insert(id.clone(), position.clone());
        record.events.push(RenderEvent::Render {
            id: id.clone(),
            position: position.clone(),
        });
        HeadlessHandle {
            id,
            serial: self.serial,
            position: position.clone(),
        }
    }

    fn update_position(
        &mut self,
        handle: &mut HeadlessHandle,
        position: &ItemPosition,
        transition: Option<&Transition>,
    ) {
        handle.position = position.clone();
        let mut record = lock(&self.record);
        record.live.insert(handle.id.clone(), position.clone());
        record.events.push(RenderEvent::Update {
            id: handle.id.clone(),
            position: position.clone(),
            transition: transition.copied(),
        });
    }

    fn remove(&mut self, handle: HeadlessHandle) {
        let mut record = lock(&self.record);
        record.live.remove(handle.id.as_str());
        record.events.push(RenderEvent::Remove { id: handle.id });
    }

    fn set_options(&mut self, options: &MasonryOptions) {
        let mut record = lock(&self.record);
        record.options = Some(options.clone());
        record.events.push(RenderEvent::Options);
    }

    fn set_container_height(&mut self, height: f64) {
        let mut record = lock(&self.record);
        record.container_height = height;
        record.events.push(RenderEvent::ContainerHeight(height));
    }

    fn set_css_variables(&mut self, variables: &CssVariables) {
        let mut record = lock(&self.record);
        record.css_variables = Some(*variables);
        record.events.push(RenderEvent::CssVariables(*variables));
    }

    fn show_empty_state(&mut self, message: Option<&str>) {
        let message = message.map(str::to_string);
        let mut record = lock(&self.record);
        record.empty_message = message.clone();
        record.events.push(RenderEvent::EmptyState(message));
    }

    fn show_loading(&mut self, visible: bool) {
        let mut record = lock(&self.record);
        record.loading = visible;
        record.events.push(RenderEvent::Loading(visible));
    }
}

/// Measurer backed by a table of true heights.
///
/// Ids missing from the table measure as the height they were laid out with.
#[derive(Debug, Clone, Default)]
pub struct TableMeasurer {
    heights: Arc<Mutex<HashMap<ItemId, f64>>>,
    measured: Arc<Mutex<Vec<ItemId>>>,
}

impl TableMeasurer {
    /// Measurer with an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the height `id` measures as.
    pub fn set_height(&self, id: ItemId, height: f64) {
        lock(&self.heights).insert(id, height);
    }

    /// Ids in the order they were measured.
    pub fn measured(&self) -> Vec<ItemId> {
        lock(&self.measured).clone()
    }
}

impl FromIterator<(ItemId, f64)> for TableMeasurer {
    fn from_iter<T: IntoIterator<Item = (ItemId, f64)>>(iter: T) -> Self {
        Self {
            heights: Arc::new(Mutex::new(iter.into_iter().collect())),
            measured: Arc::default(),
        }
    }
}

impl Measurer<HeadlessHandle> for TableMeasurer {
    fn measure(&mut self, handle: &HeadlessHandle) -> f64 {
        lock(&self.measured).push(handle.id.clone());
        lock(&self.heights)
            .get(handle.id.as_str())
            .copied()
            .unwrap_or(handle.position.height)
    }
}

#[derive(Debug, Default)]
struct ScrollSourceState {
    state: ScrollState,
    requests: Vec<(f64, ScrollBehavior)>,
    unsubscribed: bool,
}

/// Scroll source moved by hand.
///
/// `scroll_to` jumps immediately whatever the behavior, and is recorded.
#[derive(Debug, Clone, Default)]
pub struct ManualScrollSource {
    inner: Arc<Mutex<ScrollSourceState>>,
}

impl ManualScrollSource {
    /// Scroll source reporting `state` until told otherwise.
    pub fn new(state: ScrollState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScrollSourceState {
                state,
                ..ScrollSourceState::default()
            })),
        }
    }

    /// Replace the reported scroll state.
    pub fn set_state(&self, state: ScrollState) {
        lock(&self.inner).state = state;
    }

    /// Every `scroll_to` call so far.
    pub fn requests(&self) -> Vec<(f64, ScrollBehavior)> {
        lock(&self.inner).requests.clone()
    }

    /// True once the instance has unsubscribed.
    pub fn is_unsubscribed(&self) -> bool {
        lock(&self.inner).unsubscribed
    }
}

impl Subscription for ManualScrollSource {
    fn unsubscribe(&mut self) {
        lock(&self.inner).unsubscribed = true;
    }
}

impl ScrollSource for ManualScrollSource {
    fn scroll_state(&self) -> ScrollState {
        lock(&self.inner).state
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let mut inner = lock(&self.inner);
        inner.state.scroll_top = top;
        inner.requests.push((top, behavior));
    }
}

/// Resize source reporting a fixed width.
#[derive(Debug, Clone)]
pub struct FixedResizeSource {
    width: Option<f64>,
    unsubscribed: Arc<AtomicBool>,
}

impl FixedResizeSource {
    /// Resize source reporting a container `width` px wide.
    pub fn new(width: f64) -> Self {
        Self {
            width: Some(width),
            unsubscribed: Arc::default(),
        }
    }

    /// A source without a container.
    pub fn missing() -> Self {
        Self {
            width: None,
            unsubscribed: Arc::default(),
        }
    }

    /// True once the instance has unsubscribed.
    pub fn is_unsubscribed(&self) -> bool {
        self.unsubscribed.load(Ordering::Acquire)
    }
}

impl Subscription for FixedResizeSource {
    fn unsubscribe(&mut self) {
        self.unsubscribed.store(true, Ordering::Release);
    }
}

impl ResizeSource for FixedResizeSource {
    fn container_width(&self) -> Option<f64> {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(id: &ItemId, y: f64) -> ItemPosition {
        ItemPosition {
            id: id.clone(),
            x: 0.0,
            y,
            width: 100.0,
            height: 40.0,
            column: 0,
        }
    }

    #[test]
    fn renderer_tracks_live_handles() {
        let id = ItemId::new("a").unwrap();
        let mut renderer = HeadlessRenderer::new();
        let record = renderer.record();

        let mut handle = Renderer::<ItemId>::render(&mut renderer, &id, &position(&id, 0.0));
        assert_eq!(handle.serial, 1);
        Renderer::<ItemId>::update_position(&mut renderer, &mut handle, &position(&id, 50.0), None);
        assert_eq!(lock(&record).live[&id].y, 50.0);

        Renderer::<ItemId>::remove(&mut renderer, handle);
        let record = lock(&record);
        assert!(record.live.is_empty());
        assert_eq!((record.renders(), record.updates(), record.removals()), (1, 1, 1));
    }

    #[test]
    fn measurer_falls_back_to_laid_out_height() {
        let a = ItemId::new("a").unwrap();
        let b = ItemId::new("b").unwrap();
        let mut measurer: TableMeasurer = [(a.clone(), 250.0)].into_iter().collect();

        let handle = |id: &ItemId| HeadlessHandle {
            id: id.clone(),
            serial: 1,
            position: position(id, 0.0),
        };
        assert_eq!(measurer.measure(&handle(&a)), 250.0);
        assert_eq!(measurer.measure(&handle(&b)), 40.0);
        assert_eq!(measurer.measured(), vec![a, b]);
    }

    #[test]
    fn scroll_source_records_requests_and_moves() {
        let source = ManualScrollSource::new(ScrollState::new(0.0, 600.0));
        let mut boxed: Box<dyn ScrollSource> = Box::new(source.clone());
        boxed.scroll_to(320.0, ScrollBehavior::Smooth);

        assert_eq!(source.scroll_state().scroll_top, 320.0);
        assert_eq!(source.requests(), vec![(320.0, ScrollBehavior::Smooth)]);
    }

    #[test]
    fn unsubscribe_is_visible_through_clones() {
        let resize = FixedResizeSource::new(800.0);
        let mut owned = resize.clone();
        owned.unsubscribe();
        assert!(resize.is_unsubscribed());
        assert_eq!(FixedResizeSource::missing().container_width(), None);
    }
}
