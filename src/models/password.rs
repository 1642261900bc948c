//! Salted one-way password hashing built on bcrypt.

use crate::Error;

/// A bcrypt hash of a user's password.
///
/// The plaintext password is never stored, only this hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The default bcrypt cost used outside of tests.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a plaintext password with the given bcrypt `cost`.
    ///
    /// # Errors
    /// Returns [Error::Hashing] if the underlying hashing library fails.
    pub fn new(plaintext: &str, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(plaintext, cost)
            .map(Self)
            .map_err(|error| Error::Hashing(error.to_string()))
    }

    /// Wrap an existing hash string.
    ///
    /// The caller should ensure the string comes from a trusted source such
    /// as the application's database.
    pub fn from_hash(hash: String) -> Self {
        Self(hash)
    }

    /// Check `plaintext` against the stored hash.
    ///
    /// # Errors
    /// Returns [Error::Hashing] if the underlying hashing library fails,
    /// e.g. because the stored hash is not a valid bcrypt string.
    pub fn verify(&self, plaintext: &str) -> Result<bool, Error> {
        bcrypt::verify(plaintext, &self.0).map_err(|error| Error::Hashing(error.to_string()))
    }

    /// The hash as a string slice, for storage.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
