//! Customer profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AddressId, Email, UserId};

/// Avatar given to freshly registered users.
pub const PLACEHOLDER_AVATAR: &str = "/api/placeholder/40/40";

/// A signed-in customer, without credentials.
///
/// This is the profile mirrored into the visitor's session under the `user`
/// key. It never carries a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Fabricate the profile of a newly registered customer.
    ///
    /// The id is the registration time in Unix milliseconds.
    #[must_use]
    pub fn registered(name: &str, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(now.timestamp_millis()),
            name: name.trim().to_owned(),
            email,
            avatar: Some(PLACEHOLDER_AVATAR.to_owned()),
            addresses: Vec::new(),
            is_admin: false,
        }
    }

    /// The first word of the display name, for greetings.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Initials for avatar fallbacks, e.g. `JD` for "John Doe".
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// The address flagged as default, falling back to the first one.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|a| a.is_default)
            .or_else(|| self.addresses.first())
    }
}

/// What an address is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    Home,
    Work,
    Other,
}

impl AddressKind {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Work => "Work",
            Self::Other => "Other",
        }
    }
}

/// A postal address on a customer profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub kind: AddressKind,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Single-line form, e.g. `123 Main St, New York, NY 10001, USA`.
    #[must_use]
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {} {}, {}",
            self.street, self.city, self.state, self.zip_code, self.country
        )
    }
}
