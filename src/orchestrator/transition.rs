//! Animated position updates.

use crate::config::{AnimationConfig, Easing};
use std::fmt;
use std::time::Duration;

/// Interpolation applied to geometry when a live item moves.
///
/// Only `left`, `top` and `width` are animated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Time from start to end.
    pub duration: Duration,
    /// Timing function.
    pub easing: Easing,
}

impl Transition {
    const PROPERTIES: [&'static str; 3] = ["left", "top", "width"];

    /// Transition lasting `duration` along `easing`.
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// The transition configured by `config`, or `None` when animation is off.
    pub fn from_config(config: &AnimationConfig) -> Option<Self> {
        config
            .animate
            .then(|| Self::new(config.duration, config.easing))
    }

    /// Eased progress after `elapsed`, in `[0, 1]`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.easing.sample(t)
    }

    /// Interpolate between `from` and `to` after `elapsed`.
    pub fn interpolate(&self, from: f64, to: f64, elapsed: Duration) -> f64 {
        from + (to - from) * self.progress(elapsed)
    }
}

/// CSS `transition` value, e.g. `left 300ms ease, top 300ms ease, width 300ms ease`.
impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.duration.as_millis();
        for (i, property) in Self::PROPERTIES.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}ms {}", property, ms, self.easing)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_animation_has_no_transition() {
        let config = AnimationConfig {
            animate: false,
            ..AnimationConfig::default()
        };
        assert_eq!(Transition::from_config(&config), None);
    }

    #[test]
    fn css_value_lists_geometry_properties() {
        let transition = Transition::from_config(&AnimationConfig::default()).unwrap();
        assert_eq!(
            transition.to_string(),
            "left 300ms cubic-bezier(0.4, 0, 0.2, 1), \
             top 300ms cubic-bezier(0.4, 0, 0.2, 1), \
             width 300ms cubic-bezier(0.4, 0, 0.2, 1)"
        );
    }

    #[test]
    fn interpolate_reaches_target() {
        let transition = Transition::new(Duration::from_millis(200), Easing::Linear);
        assert_eq!(transition.interpolate(0.0, 100.0, Duration::from_millis(100)), 50.0);
        assert_eq!(transition.interpolate(0.0, 100.0, Duration::from_millis(400)), 100.0);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let transition = Transition::new(Duration::ZERO, Easing::Ease);
        assert_eq!(transition.progress(Duration::ZERO), 1.0);
    }
}
