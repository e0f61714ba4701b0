//! User profile model

use serde::{Deserialize, Serialize};

/// The signed-in user whose profile may be saved before publishing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct User {
    /// Identifier, unset for a user the profile service has not stored yet
    pub id: Option<String>,

    /// Name shown on published listings
    pub display_name: String,

    /// Whether local edits are waiting to be saved
    pub modified: bool,
}

impl User {
    /// Create a user with a display name
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: None,
            display_name: display_name.into(),
            modified: false,
        }
    }
}
