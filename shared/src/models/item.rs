//! Classified-ad item model

use serde::{Deserialize, Serialize};

/// Category information attached to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ItemCategory {
    /// Category type name as delivered by the item service ("flat", "share", ...)
    pub type_name: Option<String>,
}

impl ItemCategory {
    /// Create a category with the given type name
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
        }
    }
}

/// A classified-ad listing, either a draft being authored or a saved record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Item {
    /// Identifier assigned by the item service once saved
    pub id: Option<String>,

    /// Listing title
    pub title: Option<String>,

    /// Category, unset until the user picks one
    pub category: Option<ItemCategory>,

    /// Asking price in the smallest currency unit
    pub price: Option<u64>,

    /// Photo references collected by the photo step
    pub photos: Vec<String>,
}

impl Item {
    /// Create an empty draft with no category
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a draft in the given category
    pub fn with_category(type_name: impl Into<String>) -> Self {
        Self {
            category: Some(ItemCategory::new(type_name)),
            ..Self::default()
        }
    }

    /// Category type name, if any
    pub fn category_type(&self) -> Option<&str> {
        self.category
            .as_ref()
            .and_then(|category| category.type_name.as_deref())
    }

    /// Whether the item service has assigned an id
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}
