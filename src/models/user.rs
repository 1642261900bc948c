//! Defines the user model, the user's display settings, and the partial
//! update types used by the profile and settings flows.

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{Currency, PasswordHash};

/// The ID of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from a database row ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer, for binding to SQL parameters.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

/// A registered user.
///
/// This type is internal to the server and is never serialized directly.
/// Responses use [UserData], which omits the password hash and the refresh
/// token.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The user's email address. Unique across all users.
    pub email: EmailAddress,
    /// The salted one-way hash of the user's password.
    pub password_hash: PasswordHash,
    /// The currency to display amounts in.
    pub currency: Currency,
    /// Whether the client should render in dark mode.
    pub dark_mode: bool,
    /// The user's monthly budget ceiling. Non-negative.
    pub monthly_budget: f64,
    /// Reference to the user's profile photo, if one was uploaded.
    pub photo: Option<String>,
    /// The most recently issued refresh token. Presenting any other refresh
    /// token is rejected, so at most one refresh token is live per user.
    pub refresh_token: Option<String>,
    /// When the user registered.
    pub created_at: OffsetDateTime,
}

/// The validated data needed to store a new user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: EmailAddress,
    /// The hash of the user's password.
    pub password_hash: PasswordHash,
}

/// The subset of a user that is safe to send to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    /// The user's ID.
    pub id: UserID,
    /// The user's display name.
    pub full_name: String,
    /// The user's email address.
    pub email: String,
    /// The currency to display amounts in.
    pub currency: Currency,
    /// Whether the client should render in dark mode.
    pub dark_mode: bool,
    /// The user's monthly budget ceiling.
    pub monthly_budget: f64,
    /// Reference to the user's profile photo, if one was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.name.clone(),
            email: user.email.to_string(),
            currency: user.currency,
            dark_mode: user.dark_mode,
            monthly_budget: user.monthly_budget,
            photo: user.photo.clone(),
        }
    }
}

/// The user's display preferences with defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Whether the client should render in dark mode.
    pub dark_mode: bool,
    /// The currency to display amounts in.
    pub currency: Currency,
    /// The user's monthly budget ceiling.
    pub monthly_budget: f64,
}

impl From<&User> for Settings {
    fn from(user: &User) -> Self {
        Self {
            dark_mode: user.dark_mode,
            currency: user.currency,
            monthly_budget: user.monthly_budget,
        }
    }
}

/// A partial update to a user's name and email.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    /// Replacement display name, if supplied.
    pub name: Option<String>,
    /// Replacement email address, if supplied. Must remain unique.
    pub email: Option<EmailAddress>,
}

/// A partial update to a user's display settings. Only supplied fields are
/// changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    /// Replacement dark mode flag, if supplied.
    pub dark_mode: Option<bool>,
    /// Replacement display currency, if supplied.
    pub currency: Option<Currency>,
    /// Replacement monthly budget, if supplied. Must be non-negative.
    pub monthly_budget: Option<f64>,
}
