//! Error types for the masonry orchestrator.
//!
//! Errors follow the taxonomy below. Only construction and configuration
//! failures are errors; everything else is a soft miss.
//!
//! # Error Hierarchy
//!
//! - [`MasonryError`] - Top-level error returned by `MasonryBuilder::build` and config loading
//!   - `ContainerNotFound` - no valid container target (fatal construction error)
//!   - [`ConfigError`] - config file could not be read or parsed
//!   - [`InvalidColumnCount`] - a column count of zero was supplied
//!
//! # Soft Misses
//!
//! Looking up a position, handle, or scroll target for an unknown id is not an
//! error: those operations return `Option`/`bool`. Failures of the external
//! load-more operation belong to the caller and propagate in the caller's own
//! error type; the loading flag is cleared regardless.
//!
//! # Degenerate Geometry
//!
//! A non-positive container width is not rejected by the layout engine and
//! yields zero or negative geometry. Callers guard against it upstream.

use crate::config::{ConfigError, InvalidColumnCount};
use thiserror::Error;

/// Top-level error encompassing all failure modes of the masonry core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MasonryError {
    /// The resize source could not resolve a container to lay out into.
    ///
    /// Aborts initialization entirely; no instance is created.
    #[error("Container element not found")]
    ContainerNotFound,

    /// Failed to load configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Options contained an invalid column count.
    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] InvalidColumnCount),
}
