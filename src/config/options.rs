//! Resolved runtime options for a masonry instance.

use super::columns::ColumnSpec;
use super::easing::Easing;
use std::time::Duration;

/// Geometry inputs of the packing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Gap between columns and between stacked items (px).
    pub gap: f64,
    /// Padding on the left and right of the container (px).
    pub padding: f64,
    /// Fixed column count or responsive breakpoints.
    pub columns: ColumnSpec,
    /// Height used for items that have not been measured yet (px).
    pub estimated_item_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: 16.0,
            padding: 0.0,
            columns: ColumnSpec::default(),
            estimated_item_height: 400.0,
        }
    }
}

/// Presentational transition applied to position updates.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// Animate position updates of items that are already materialized.
    pub animate: bool,
    /// Transition length.
    pub duration: Duration,
    /// Transition timing function.
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            animate: true,
            duration: Duration::from_millis(300),
            easing: Easing::default(),
        }
    }
}

/// Scroll culling settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualizationConfig {
    /// When `false`, every item is materialized on every pass.
    pub enabled: bool,
    /// Extra margin above and below the viewport, in estimated item heights.
    pub overscan: f64,
}

impl Default for VirtualizationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            overscan: 3.0,
        }
    }
}

/// Timer intervals of the host-driven scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingConfig {
    /// Quiet window before a container resize triggers a layout pass.
    pub resize_debounce: Duration,
    /// Minimum spacing between scroll-driven recompute requests (~60 Hz).
    pub scroll_throttle: Duration,
    /// Quiet window after the last scroll event before `is_scrolling` clears.
    pub scroll_quiet: Duration,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            resize_debounce: Duration::from_millis(150),
            scroll_throttle: Duration::from_millis(16),
            scroll_quiet: Duration::from_millis(150),
        }
    }
}

/// Fully resolved options of a `Masonry` instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MasonryOptions {
    /// Packing geometry.
    pub layout: LayoutConfig,
    /// Position-update transitions.
    pub animation: AnimationConfig,
    /// Scroll culling.
    pub virtualization: VirtualizationConfig,
    /// Debounce and throttle intervals.
    pub scheduling: SchedulingConfig,
    /// Distance from the bottom of the content (px) at which load-more fires.
    pub load_more_threshold: f64,
    /// Whether the renderer is asked to show a loading indicator.
    pub show_loading: bool,
    /// Message shown by the empty-state indicator.
    pub empty_message: String,
}

impl Default for MasonryOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            animation: AnimationConfig::default(),
            virtualization: VirtualizationConfig::default(),
            scheduling: SchedulingConfig::default(),
            load_more_threshold: 500.0,
            show_loading: true,
            empty_message: "No items to display".to_string(),
        }
    }
}

impl MasonryOptions {
    /// Overscan margin in pixels: `overscan` estimated item heights.
    pub fn overscan_px(&self) -> f64 {
        self.virtualization.overscan * self.layout.estimated_item_height
    }
}
