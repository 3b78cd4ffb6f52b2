//! Item identifier newtype with a smart constructor.
//!
//! Identifiers validate non-empty strings at construction time.
//! The raw constructor is never exported - use `ItemId::new` only.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable unique identifier of an item in the authoritative sequence.
///
/// The layout algorithm treats items as opaque beyond this id; two items
/// with the same id are the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Smart constructor: validates non-empty id
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidItemId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidItemId::Empty);
        }
        Ok(Self(raw))
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = InvalidItemId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// Error returned when an [`ItemId`] fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidItemId {
    /// The identifier was an empty string.
    #[error("Item ID cannot be empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn item_id_accepts_valid_string() {
        let id = ItemId::new("post-1234");
        assert!(id.is_ok(), "Valid item ID should be accepted");
    }

    #[test]
    fn item_id_rejects_empty_string() {
        let id = ItemId::new("");
        assert!(
            matches!(id, Err(InvalidItemId::Empty)),
            "Empty string should return InvalidItemId::Empty"
        );
    }

    #[test]
    fn item_id_as_str_returns_raw_value() {
        let id = ItemId::new("post-1234").expect("Valid item ID");
        assert_eq!(id.as_str(), "post-1234");
    }

    #[test]
    fn item_id_display_returns_inner_string() {
        let id = ItemId::new("post-1234").expect("Valid item ID");
        assert_eq!(id.to_string(), "post-1234");
    }

    #[test]
    fn item_id_can_be_looked_up_by_str() {
        let mut map = HashMap::new();
        map.insert(ItemId::new("a").unwrap(), 1);
        assert_eq!(map.get("a"), Some(&1));
    }

    #[test]
    fn item_id_deserializes_from_json_string() {
        let id: ItemId = serde_json::from_str("\"card-7\"").expect("valid id");
        assert_eq!(id.as_str(), "card-7");
    }

    #[test]
    fn item_id_deserialize_rejects_empty_string() {
        let result: Result<ItemId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err(), "Empty id must not deserialize");
    }
}
