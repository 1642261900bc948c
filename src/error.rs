//! Defines the app level error type and its conversion to JSON responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent malformed or missing input, e.g. a required field was
    /// absent or an enum value was not recognized.
    #[error("{0}")]
    Validation(String),

    /// The email and password combination did not match a registered user.
    ///
    /// The message is deliberately uniform so that clients cannot tell a
    /// missing account apart from a wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The bearer token was missing, malformed, expired, or referred to a
    /// user that no longer exists.
    #[error("authentication required")]
    Unauthorized,

    /// The email address is already registered to another user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The requested record does not exist, or exists but is owned by another
    /// user. The two cases are indistinguishable on purpose.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred in the password hashing library.
    ///
    /// The inner string should only be logged on the server, never sent to
    /// the client.
    #[error("hashing failed: {0}")]
    Hashing(String),

    /// A token could not be signed.
    #[error("could not create an authentication token")]
    TokenCreation,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::Sql(error),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Error::Validation(message) => (StatusCode::BAD_REQUEST, message.to_owned()),
            Error::InvalidCredentials | Error::Unauthorized => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Error::DuplicateEmail => (StatusCode::CONFLICT, self.to_string()),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            error => {
                tracing::error!("internal error while handling request: {error}");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
