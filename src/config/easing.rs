//! Transition easing curves.
//!
//! Easing is purely presentational. The curve is handed to the renderer
//! either as a CSS timing function or sampled directly for hosts that
//! interpolate geometry themselves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timing function for animated position updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    /// `linear`
    Linear,
    /// `ease`
    Ease,
    /// `ease-in`
    EaseIn,
    /// `ease-out`
    EaseOut,
    /// `ease-in-out`
    EaseInOut,
    /// `cubic-bezier(x1, y1, x2, y2)`; `x1` and `x2` lie in `[0, 1]`.
    CubicBezier(f64, f64, f64, f64),
}

/// Error returned when an easing string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid easing function: {0:?}")]
pub struct InvalidEasing(pub String);

impl Default for Easing {
    fn default() -> Self {
        Self::CubicBezier(0.4, 0.0, 0.2, 1.0)
    }
}

impl Easing {
    /// Control points of the equivalent cubic Bézier curve.
    pub fn control_points(&self) -> (f64, f64, f64, f64) {
        match *self {
            Self::Linear => (0.0, 0.0, 1.0, 1.0),
            Self::Ease => (0.25, 0.1, 0.25, 1.0),
            Self::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => (0.42, 0.0, 0.58, 1.0),
            Self::CubicBezier(x1, y1, x2, y2) => (x1, y1, x2, y2),
        }
    }

    /// Eased progress for linear progress `t`, clamped to `[0, 1]`.
    pub fn sample(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if matches!(self, Self::Linear) || t == 0.0 || t == 1.0 {
            return t;
        }
        let (x1, y1, x2, y2) = self.control_points();
        let s = solve_curve_x(t, x1, x2);
        bezier(s, y1, y2)
    }
}

/// One axis of a cubic Bézier with endpoints fixed at 0 and 1.
fn bezier(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`.
///
/// Newton iteration first, bisection when the slope flattens out.
fn solve_curve_x(x: f64, x1: f64, x2: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    let mut s = x;
    for _ in 0..8 {
        let error = bezier(s, x1, x2) - x;
        if error.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - error / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    while hi - lo > EPSILON {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
        }
    }
}

impl FromStr for Easing {
    type Err = InvalidEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::Ease),
            "ease-in" => return Ok(Self::EaseIn),
            "ease-out" => return Ok(Self::EaseOut),
            "ease-in-out" => return Ok(Self::EaseInOut),
            _ => {}
        }

        let invalid = || InvalidEasing(s.to_string());
        let args = trimmed
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let values = args
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        match values.as_slice() {
            &[x1, y1, x2, y2]
                if (0.0..=1.0).contains(&x1)
                    && (0.0..=1.0).contains(&x2)
                    && y1.is_finite()
                    && y2.is_finite() =>
            {
                Ok(Self::CubicBezier(x1, y1, x2, y2))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = InvalidEasing;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_material_standard_curve() {
        assert_eq!(Easing::default().to_string(), "cubic-bezier(0.4, 0, 0.2, 1)");
    }

    #[test]
    fn keywords_round_trip_through_display() {
        for keyword in ["linear", "ease", "ease-in", "ease-out", "ease-in-out"] {
            let easing: Easing = keyword.parse().expect("keyword parses");
            assert_eq!(easing.to_string(), keyword);
        }
    }

    #[test]
    fn parses_cubic_bezier_with_spaces() {
        let easing: Easing = "cubic-bezier(0.25, 0.1 ,0.25,1)".parse().unwrap();
        assert_eq!(easing, Easing::CubicBezier(0.25, 0.1, 0.25, 1.0));
    }

    #[test]
    fn rejects_x_outside_unit_interval() {
        assert!("cubic-bezier(1.5, 0, 0.2, 1)".parse::<Easing>().is_err());
    }

    #[test]
    fn rejects_wrong_arity_and_garbage() {
        assert!("cubic-bezier(0.1, 0.2, 0.3)".parse::<Easing>().is_err());
        assert!("bounce".parse::<Easing>().is_err());
        assert!("cubic-bezier(a, b, c, d)".parse::<Easing>().is_err());
    }

    #[test]
    fn sample_hits_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::default()] {
            assert_eq!(easing.sample(0.0), 0.0);
            assert_eq!(easing.sample(1.0), 1.0);
        }
    }

    #[test]
    fn sample_clamps_out_of_range_progress() {
        assert_eq!(Easing::EaseOut.sample(-1.0), 0.0);
        assert_eq!(Easing::EaseOut.sample(2.0), 1.0);
    }

    #[test]
    fn linear_sample_is_identity() {
        assert_eq!(Easing::Linear.sample(0.3), 0.3);
    }

    #[test]
    fn ease_in_lags_and_ease_out_leads() {
        assert!(Easing::EaseIn.sample(0.5) < 0.5);
        assert!(Easing::EaseOut.sample(0.5) > 0.5);
    }

    #[test]
    fn symmetric_curve_is_half_at_midpoint() {
        let mid = Easing::EaseInOut.sample(0.5);
        assert!((mid - 0.5).abs() < 1e-4, "got {mid}");
    }

    #[test]
    fn sample_is_monotonic() {
        let easing = Easing::default();
        let mut previous = 0.0;
        for step in 1..=100 {
            let value = easing.sample(step as f64 / 100.0);
            assert!(value >= previous - 1e-9);
            previous = value;
        }
    }
}
