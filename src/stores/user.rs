//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{NewUser, ProfileUpdate, SettingsUpdate, User, UserID},
};

/// Handles the creation and retrieval of users and their settings.
pub trait UserStore {
    /// Create a new user in the store.
    ///
    /// # Errors
    /// Returns [Error::DuplicateEmail] if the email address is already
    /// registered.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error>;

    /// Retrieve a user by their ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has this ID.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Retrieve a user by their email address.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has this email address.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;

    /// Overwrite the name and email fields supplied in `update` and return
    /// the merged user.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has this ID, or
    /// [Error::DuplicateEmail] if the new email is already registered.
    fn update_profile(&mut self, id: UserID, update: ProfileUpdate) -> Result<User, Error>;

    /// Overwrite the settings fields supplied in `update` and return the
    /// merged user.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has this ID.
    fn update_settings(&mut self, id: UserID, update: SettingsUpdate) -> Result<User, Error>;

    /// Replace the user's stored refresh token. `None` invalidates all
    /// outstanding refresh tokens.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no user has this ID.
    fn set_refresh_token(&mut self, id: UserID, refresh_token: Option<&str>) -> Result<(), Error>;
}
