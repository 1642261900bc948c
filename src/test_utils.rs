//! Shared helpers for endpoint tests: an in-memory server and a registered
//! test user.

use std::str::FromStr;

use axum::http::StatusCode;
use axum_test::TestServer;
use email_address::EmailAddress;
use rusqlite::Connection;
use serde_json::json;
use time::macros::datetime;

use crate::{
    AuthConfig, Catalog, build_router,
    auth::{SessionResponse, TokenPair},
    db::{SqlAppState, create_app_state},
    endpoints,
    models::{Currency, PasswordHash, User, UserData, UserID},
};

/// The minimum bcrypt cost, to keep password hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

/// An app state backed by an in-memory database.
pub fn test_state() -> SqlAppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    create_app_state(
        connection,
        AuthConfig::new("test access secret", "test refresh secret")
            .with_bcrypt_cost(TEST_BCRYPT_COST),
        Catalog::standard(),
    )
    .expect("Could not create app state.")
}

/// A test server running the full API against an in-memory database.
pub fn test_server() -> TestServer {
    TestServer::try_new(build_router(test_state())).expect("Could not create test server.")
}

/// The user and tokens produced by registering through the API.
pub struct Session {
    /// The registered user as returned by the API.
    pub user: UserData,
    /// The token pair issued at registration.
    pub tokens: TokenPair,
}

/// Register a user called "Ashley" with the password "hunter2".
pub async fn sign_up(server: &TestServer, email: &str) -> Session {
    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({
            "fullName": "Ashley",
            "email": email,
            "password": "hunter2",
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let SessionResponse { user, tokens } = response.json::<SessionResponse>();

    Session { user, tokens }
}

/// A user record for tests that do not need a database.
pub fn test_user() -> User {
    User {
        id: UserID::new(1),
        name: "Ashley".to_owned(),
        email: EmailAddress::from_str("ashley@example.com").unwrap(),
        password_hash: PasswordHash::new("hunter2", TEST_BCRYPT_COST).unwrap(),
        currency: Currency::BASE,
        dark_mode: false,
        monthly_budget: 10_000.0,
        photo: None,
        refresh_token: None,
        created_at: datetime!(2024-01-01 00:00 UTC),
    }
}
