//! The item abstraction seen by the layout and virtualization engines.

use super::identifiers::ItemId;

/// Anything that can be placed by the masonry layout.
///
/// Content and media are irrelevant to layout; only the stable id matters.
/// Ordering comes from the position of the item in the authoritative
/// sequence held by the orchestrator.
pub trait MasonryItem {
    /// Stable unique identifier.
    fn id(&self) -> &ItemId;
}

impl MasonryItem for ItemId {
    fn id(&self) -> &ItemId {
        self
    }
}

impl<T: MasonryItem + ?Sized> MasonryItem for Box<T> {
    fn id(&self) -> &ItemId {
        (**self).id()
    }
}
