//! Visibility computation over layout snapshots.
//!
//! Given the latest `LayoutState` and the scroll state, derive the subset of
//! items that intersects the viewport plus an overscan margin. Recomputes
//! triggered by scrolling are coalesced to at most one per frame.

pub mod engine;
pub mod scheduler;
pub mod scroll;
pub mod visible_set;

pub use engine::VirtualizationEngine;
pub use scheduler::{Debounce, FrameScheduler, Throttle};
pub use scroll::{ScrollBehavior, ScrollDirection, ScrollState};
pub use visible_set::{VisibilityUpdate, VisibleItem, VisibleSet};
