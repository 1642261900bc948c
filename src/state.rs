//! Implements the state shared by the REST server's route handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};
use time::Duration;

use crate::{catalog::Catalog, models::PasswordHash};

/// How long an access token stays valid.
const ACCESS_TOKEN_DURATION: Duration = Duration::hours(1);

/// How long a refresh token stays valid.
const REFRESH_TOKEN_DURATION: Duration = Duration::days(7);

#[derive(Clone)]
struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_ref()),
            decoding: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

/// The signing keys and lifetimes for access and refresh tokens.
///
/// Secrets are read once at startup and baked into this config, so a
/// missing secret fails the process at launch instead of failing each
/// request.
#[derive(Clone)]
pub struct AuthConfig {
    access_keys: JwtKeys,
    refresh_keys: JwtKeys,
    /// How long newly issued access tokens stay valid.
    pub access_token_duration: Duration,
    /// How long newly issued refresh tokens stay valid.
    pub refresh_token_duration: Duration,
    /// The bcrypt cost used when hashing new passwords.
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// Create an auth config from the two token signing secrets.
    ///
    /// Access and refresh tokens use separate secrets so one kind of token
    /// can never be presented as the other.
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        Self {
            access_keys: JwtKeys::new(access_secret),
            refresh_keys: JwtKeys::new(refresh_secret),
            access_token_duration: ACCESS_TOKEN_DURATION,
            refresh_token_duration: REFRESH_TOKEN_DURATION,
            bcrypt_cost: PasswordHash::DEFAULT_COST,
        }
    }

    /// Use a different bcrypt cost, e.g. the minimum cost in tests.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// The encoding key for access tokens.
    pub fn access_encoding_key(&self) -> &EncodingKey {
        &self.access_keys.encoding
    }

    /// The decoding key for access tokens.
    pub fn access_decoding_key(&self) -> &DecodingKey {
        &self.access_keys.decoding
    }

    /// The encoding key for refresh tokens.
    pub fn refresh_encoding_key(&self) -> &EncodingKey {
        &self.refresh_keys.encoding
    }

    /// The decoding key for refresh tokens.
    pub fn refresh_decoding_key(&self) -> &DecodingKey {
        &self.refresh_keys.decoding
    }
}

/// The state of the REST server.
///
/// Generic over the store types so that handlers depend on the store
/// traits rather than on SQLite directly.
#[derive(Clone)]
pub struct AppState<C, T, U> {
    /// The token signing configuration.
    pub auth: AuthConfig,
    /// The fixed built-in category set.
    pub catalog: Arc<Catalog>,
    /// Creates and retrieves custom categories.
    pub category_store: C,
    /// Creates and retrieves transactions.
    pub transaction_store: T,
    /// Creates and retrieves users.
    pub user_store: U,
}

impl<C, T, U> AppState<C, T, U> {
    /// Create a new [AppState].
    pub fn new(
        auth: AuthConfig,
        catalog: Catalog,
        category_store: C,
        transaction_store: T,
        user_store: U,
    ) -> Self {
        Self {
            auth,
            catalog: Arc::new(catalog),
            category_store,
            transaction_store,
            user_store,
        }
    }
}

// This impl lets the bearer token extractor access the decoding keys
// without knowing the concrete store types.
impl<C: Clone, T: Clone, U: Clone> FromRef<AppState<C, T, U>> for AuthConfig {
    fn from_ref(state: &AppState<C, T, U>) -> Self {
        state.auth.clone()
    }
}
