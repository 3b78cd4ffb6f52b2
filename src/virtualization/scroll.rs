//! Scroll state as reported by the host.

use serde::{Deserialize, Serialize};

/// Scroll offset and viewport extent of the scroll container (px).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollState {
    /// Offset of the viewport top from the content top (px).
    pub scroll_top: f64,
    /// Visible height of the scroll container (px).
    pub viewport_height: f64,
}

impl ScrollState {
    /// Scroll state at `scroll_top` with a viewport `viewport_height` tall.
    pub fn new(scroll_top: f64, viewport_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
        }
    }

    /// Bottom edge of the viewport.
    pub fn viewport_bottom(&self) -> f64 {
        self.scroll_top + self.viewport_height
    }
}

/// Direction of travel since the last visible-set computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    /// Scroll top decreased.
    Up,
    /// Scroll top increased.
    Down,
    /// Scroll top unchanged.
    None,
}

/// How the scroll source should move when asked to scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Animated scroll.
    #[default]
    Smooth,
    /// Jump straight to the target.
    Instant,
    /// Let the scroll source decide.
    Auto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_bottom_adds_height() {
        assert_eq!(ScrollState::new(4600.0, 800.0).viewport_bottom(), 5400.0);
    }

    #[test]
    fn default_behavior_is_smooth() {
        assert_eq!(ScrollBehavior::default(), ScrollBehavior::Smooth);
    }
}
