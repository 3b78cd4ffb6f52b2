//! Layout layer - masonry packing.
//!
//! # Module Structure
//!
//! - `engine`: `calculate` (pure packing pass) and `LayoutEngine`
//! - `state`: `LayoutState` snapshot and `ItemPosition`
//! - `overrides`: `HeightOverrides` - measured heights fed back into packing
//! - `css`: `CssVariables` - column geometry for the rendering layer

pub mod css;
pub mod engine;
pub mod overrides;
pub mod state;

pub use css::CssVariables;
pub use engine::{calculate, column_width, LayoutEngine};
pub use overrides::HeightOverrides;
pub use state::{ItemPosition, LayoutState};
