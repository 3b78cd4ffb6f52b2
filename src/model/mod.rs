//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod item;

// Re-export for convenience
pub use error::MasonryError;
pub use identifiers::{InvalidItemId, ItemId};
pub use item::MasonryItem;
