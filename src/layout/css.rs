//! Derived geometry exposed to the rendering layer.

use std::fmt;

/// Column geometry shared by every item, published as CSS custom properties
/// so individual items never carry column styling themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssVariables {
    /// Shared column width (px).
    pub column_width: f64,
    /// Gap between columns and rows (px).
    pub gap: f64,
}

impl CssVariables {
    /// Custom property carrying the column width.
    pub const COLUMN_WIDTH: &'static str = "--masonry-column-width";
    /// Custom property carrying the gap.
    pub const GAP: &'static str = "--masonry-gap";

    /// `(property, value)` pairs, values in `px`.
    pub fn pairs(&self) -> [(&'static str, String); 2] {
        [
            (Self::COLUMN_WIDTH, format!("{}px", self.column_width)),
            (Self::GAP, format!("{}px", self.gap)),
        ]
    }
}

impl fmt::Display for CssVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [(k1, v1), (k2, v2)] = self.pairs();
        write!(f, "{k1}: {v1}; {k2}: {v2};")
    }
}
