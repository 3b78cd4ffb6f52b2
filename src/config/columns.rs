//! Column count resolution: fixed counts and responsive breakpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of columns. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ColumnCount(u32);

/// Error returned when a column count of zero is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("column count must be >= 1 (got {0})")]
pub struct InvalidColumnCount(pub u32);

impl ColumnCount {
    /// A single column; the fallback when no breakpoint matches.
    pub const ONE: Self = Self(1);

    /// Smart constructor that validates count is >= 1.
    pub fn new(count: u32) -> Result<Self, InvalidColumnCount> {
        if count == 0 {
            Err(InvalidColumnCount(count))
        } else {
            Ok(Self(count))
        }
    }

    /// The count as a plain integer.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Count as a `usize` for indexing column buffers.
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl Default for ColumnCount {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for ColumnCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for ColumnCount {
    type Error = InvalidColumnCount;

    fn try_from(count: u32) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<ColumnCount> for u32 {
    fn from(count: ColumnCount) -> Self {
        count.0
    }
}

/// A `(min_width, columns)` rule selecting layout density by container width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnBreakpoint {
    /// Minimum container width (px) at which this rule applies.
    pub min_width: f64,
    /// Number of columns at this breakpoint.
    pub columns: ColumnCount,
}

impl ColumnBreakpoint {
    /// Breakpoint applying `columns` from `min_width` upward.
    pub fn new(min_width: f64, columns: ColumnCount) -> Self {
        Self { min_width, columns }
    }
}

/// How the column count is chosen.
///
/// `Fixed` bypasses the breakpoint scan entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSpec {
    /// Explicit fixed column count.
    Fixed(ColumnCount),
    /// Responsive breakpoints, in any order.
    Responsive(Vec<ColumnBreakpoint>),
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self::Responsive(default_breakpoints())
    }
}

impl ColumnSpec {
    /// Resolve the column count for a container width.
    ///
    /// Breakpoints are scanned by descending `min_width`; the first entry whose
    /// `min_width <= container_width` wins. Among breakpoints with equal
    /// `min_width` the one listed first wins. No match yields one column.
    pub fn resolve(&self, container_width: f64) -> ColumnCount {
        match self {
            Self::Fixed(count) => *count,
            Self::Responsive(breakpoints) => {
                let mut best: Option<&ColumnBreakpoint> = None;
                for bp in breakpoints {
                    if bp.min_width > container_width {
                        continue;
                    }
                    match best {
                        Some(current) if bp.min_width <= current.min_width => {}
                        _ => best = Some(bp),
                    }
                }
                best.map(|bp| bp.columns).unwrap_or(ColumnCount::ONE)
            }
        }
    }
}

/// Breakpoints used when none are configured: 4/3/2/1 columns at
/// 1280/900/640/0 px.
pub fn default_breakpoints() -> Vec<ColumnBreakpoint> {
    [(1280.0, 4), (900.0, 3), (640.0, 2), (0.0, 1)]
        .into_iter()
        .map(|(min_width, columns)| ColumnBreakpoint {
            min_width,
            columns: ColumnCount(columns),
        })
        .collect()
}
