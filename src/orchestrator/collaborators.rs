//! Capabilities the host injects into a `Masonry` instance.
//!
//! The orchestrator never touches a platform surface directly. Rendering,
//! size measurement and event sourcing all go through these traits, so the
//! same state machine runs against a DOM binding, a native toolkit or the
//! in-memory doubles in `crate::headless`.

use super::transition::Transition;
use crate::config::MasonryOptions;
use crate::layout::{CssVariables, ItemPosition};
use crate::virtualization::{ScrollBehavior, ScrollState};

/// Something that can stop delivering notifications.
pub trait Subscription {
    /// Stop delivering events. Must tolerate repeated calls.
    fn unsubscribe(&mut self);
}

/// Source of scroll notifications for the scroll container.
pub trait ScrollSource: Subscription + Send {
    /// Current offset and viewport height.
    fn scroll_state(&self) -> ScrollState;

    /// Move the container so that `top` is at the top of the viewport.
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
}

/// Source of container resize notifications.
pub trait ResizeSource: Subscription + Send {
    /// Width of the layout container, or `None` when there is no container.
    fn container_width(&self) -> Option<f64>;
}

/// Turns items into live visual handles.
pub trait Renderer<I>: Send {
    /// Live visual representation of one item.
    type Handle: Send;

    /// Materialize `item` at `position`.
    fn render(&mut self, item: &I, position: &ItemPosition) -> Self::Handle;

    /// Move a live handle. `transition` is `None` for instant moves.
    fn update_position(
        &mut self,
        handle: &mut Self::Handle,
        position: &ItemPosition,
        transition: Option<&Transition>,
    );

    /// Detach and release a handle.
    fn remove(&mut self, handle: Self::Handle);

    /// Called with the merged options after every `set_options`.
    fn set_options(&mut self, _options: &MasonryOptions) {}

    /// Container height changed after a pass.
    fn set_container_height(&mut self, _height: f64) {}

    /// Column geometry changed after a pass.
    fn set_css_variables(&mut self, _variables: &CssVariables) {}

    /// `Some(message)` shows the empty-state indicator, `None` hides it.
    fn show_empty_state(&mut self, _message: Option<&str>) {}

    /// Show or hide the loading indicator.
    fn show_loading(&mut self, _visible: bool) {}
}

/// Reads the true rendered height of a handle after paint.
pub trait Measurer<H>: Send {
    /// True rendered height of `handle`. Only called after a paint.
    fn measure(&mut self, handle: &H) -> f64;
}
