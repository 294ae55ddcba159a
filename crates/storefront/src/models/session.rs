//! Session-related types.
//!
//! The session replaces browser local storage: it holds the signed-in
//! profile, the cart and a pending flash message. Entries are plain JSON
//! with no versioning.

use serde::{Deserialize, Serialize};

/// Session keys.
pub mod keys {
    /// Key for the signed-in profile (`elite_store_core::User`).
    pub const USER: &str = "user";

    /// Key for the cart (`elite_store_core::Cart`).
    pub const CART: &str = "cart";

    /// Key for the flash message shown on the next rendered page.
    pub const FLASH: &str = "flash";
}

/// Tone of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// A one-shot notice, shown once and then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub title: String,
    pub description: String,
}

impl Flash {
    /// A success notice.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    /// An error notice.
    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Whether this is an error notice.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == FlashKind::Error
    }
}
