//! Masonry layout with scroll virtualization.
//!
//! A column-balanced ("masonry") packing engine, a visibility engine that
//! culls items outside the viewport, and an orchestrator that reconciles
//! live item handles against both with minimal churn.
//!
//! The core is pure: `layout::calculate` and the visible-set computation are
//! synchronous functions of their inputs. Everything platform-specific
//! (drawing, measuring, scroll and resize events) enters through the traits
//! in [`orchestrator`], with in-memory implementations in [`headless`].

pub mod config;
pub mod headless;
pub mod layout;
pub mod logging;
pub mod model;
pub mod orchestrator;
pub mod simulation;
pub mod virtualization;

pub use config::MasonryOptions;
pub use layout::{ItemPosition, LayoutEngine, LayoutState};
pub use model::{ItemId, MasonryError, MasonryItem};
pub use orchestrator::{Masonry, MasonryBuilder, SharedMasonry};
pub use virtualization::{VirtualizationEngine, VisibleSet};
