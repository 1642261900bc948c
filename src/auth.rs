//! Bearer-token authentication: token issuance and verification, the
//! per-request claims extractor, and the register/login/refresh endpoints.
//!
//! Sessions are not persisted server side. Each request independently
//! verifies its bearer token; the only server-side session state is the
//! most recently issued refresh token stored on the user record.

use std::str::FromStr;

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, request::Parts},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use email_address::EmailAddress;
use jsonwebtoken::{Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    AppState, AuthConfig, Error,
    models::{NewUser, PasswordHash, User, UserData, UserID},
    stores::UserStore,
};

/// The contents of an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// The ID of the authenticated user.
    pub sub: UserID,
    /// The email address of the authenticated user.
    pub email: String,
    /// The time the token was issued, as a unix timestamp.
    pub iat: usize,
    /// The expiry time of the token, as a unix timestamp.
    pub exp: usize,
}

/// The contents of a refresh token.
///
/// Refresh tokens carry the user ID only. The `jti` nonce makes every
/// issued token unique so that a superseded token can be told apart from
/// the live one.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// The ID of the user the token was issued to.
    pub sub: UserID,
    /// A unique ID for this token.
    pub jti: String,
    /// The time the token was issued, as a unix timestamp.
    pub iat: usize,
    /// The expiry time of the token, as a unix timestamp.
    pub exp: usize,
}

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// The short-lived token presented as a bearer credential.
    pub access_token: String,
    /// The long-lived token exchanged for new pairs.
    pub refresh_token: String,
    /// How long the access token stays valid, in seconds.
    pub expires_in: i64,
    /// The authentication scheme the access token is used with.
    pub token_type: String,
}

/// Sign a new access/refresh token pair for `user`.
///
/// # Errors
/// Returns [Error::TokenCreation] if a token could not be signed.
pub fn issue_token_pair(auth: &AuthConfig, user: &User) -> Result<TokenPair, Error> {
    let now = OffsetDateTime::now_utc();
    let iat = now.unix_timestamp() as usize;

    let access_claims = AccessClaims {
        sub: user.id,
        email: user.email.to_string(),
        iat,
        exp: (now + auth.access_token_duration).unix_timestamp() as usize,
    };
    let access_token = encode(
        &Header::default(),
        &access_claims,
        auth.access_encoding_key(),
    )
    .map_err(|_| Error::TokenCreation)?;

    let refresh_claims = RefreshClaims {
        sub: user.id,
        jti: Uuid::new_v4().to_string(),
        iat,
        exp: (now + auth.refresh_token_duration).unix_timestamp() as usize,
    };
    let refresh_token = encode(
        &Header::default(),
        &refresh_claims,
        auth.refresh_encoding_key(),
    )
    .map_err(|_| Error::TokenCreation)?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        expires_in: auth.access_token_duration.whole_seconds(),
        token_type: "Bearer".to_owned(),
    })
}

/// Issue a token pair for `user` and record its refresh token as the single
/// live refresh token for that user.
///
/// Any previously issued refresh token is superseded and will be rejected
/// by [refresh].
pub fn establish_session<U: UserStore>(
    auth: &AuthConfig,
    user: &User,
    user_store: &mut U,
) -> Result<TokenPair, Error> {
    let tokens = issue_token_pair(auth, user)?;
    user_store.set_refresh_token(user.id, Some(&tokens.refresh_token))?;

    Ok(tokens)
}

/// Resolve the user an access token was issued to.
///
/// # Errors
/// Returns [Error::Unauthorized] if the user no longer exists, so that a
/// stale token cannot be used to probe whether an account was deleted.
pub fn authenticate<U: UserStore>(claims: &AccessClaims, user_store: &U) -> Result<User, Error> {
    user_store.get(claims.sub).map_err(|error| match error {
        Error::NotFound => Error::Unauthorized,
        error => error,
    })
}

impl<S> FromRequestParts<S> for AccessClaims
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::Unauthorized)?;

        let auth = AuthConfig::from_ref(state);

        decode::<AccessClaims>(
            bearer.token(),
            auth.access_decoding_key(),
            &Validation::default(),
        )
        .map(|token_data| token_data.claims)
        .map_err(|_| Error::Unauthorized)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RegisterRequest {
    full_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct LogInRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RefreshRequest {
    refresh_token: Option<String>,
}

/// The response to a successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SessionResponse {
    pub user: UserData,
    pub tokens: TokenPair,
}

fn required(field: Option<String>, name: &str) -> Result<String, Error> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Validation(format!("{name} is required"))),
    }
}

pub(crate) fn parse_email(email: &str) -> Result<EmailAddress, Error> {
    EmailAddress::from_str(email)
        .map_err(|error| Error::Validation(format!("invalid email address: {error}")))
}

/// A route handler for registering a new user.
///
/// The new user is signed in immediately: the response carries a token
/// pair alongside the created user.
pub(crate) async fn register<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), Error>
where
    C: Clone + Send + Sync,
    T: Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let name = required(request.full_name, "fullName")?;
    let email = parse_email(&required(request.email, "email")?)?;
    let password = required(request.password, "password")?;

    let password_hash = PasswordHash::new(&password, state.auth.bcrypt_cost)?;
    let user = state.user_store.create(NewUser {
        name,
        email,
        password_hash,
    })?;

    tracing::info!("registered user {:?}", user.id);

    let tokens = establish_session(&state.auth, &user, &mut state.user_store)?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user: UserData::from(&user),
            tokens,
        }),
    ))
}

/// A route handler for signing in with an email and password.
///
/// Every failure mode reports the same [Error::InvalidCredentials] so that
/// the response does not reveal which accounts exist.
pub(crate) async fn log_in<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    Json(request): Json<LogInRequest>,
) -> Result<Json<SessionResponse>, Error>
where
    C: Clone + Send + Sync,
    T: Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(Error::InvalidCredentials);
    };

    let email = EmailAddress::from_str(&email).map_err(|_| Error::InvalidCredentials)?;

    let user = state.user_store.get_by_email(&email).map_err(|error| match error {
        Error::NotFound => Error::InvalidCredentials,
        error => error,
    })?;

    if !user.password_hash.verify(&password)? {
        return Err(Error::InvalidCredentials);
    }

    let tokens = establish_session(&state.auth, &user, &mut state.user_store)?;

    Ok(Json(SessionResponse {
        user: UserData::from(&user),
        tokens,
    }))
}

/// A route handler for exchanging a refresh token for a new token pair.
///
/// Only the most recently issued refresh token is accepted: presenting a
/// superseded token fails with [Error::Unauthorized] even if it has not
/// expired yet.
pub(crate) async fn refresh<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, Error>
where
    C: Clone + Send + Sync,
    T: Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let Some(refresh_token) = request.refresh_token else {
        return Err(Error::Validation("refreshToken is required".to_owned()));
    };

    let claims = decode::<RefreshClaims>(
        &refresh_token,
        state.auth.refresh_decoding_key(),
        &Validation::default(),
    )
    .map_err(|_| Error::Unauthorized)?
    .claims;

    let user = state.user_store.get(claims.sub).map_err(|error| match error {
        Error::NotFound => Error::Unauthorized,
        error => error,
    })?;

    if user.refresh_token.as_deref() != Some(refresh_token.as_str()) {
        return Err(Error::Unauthorized);
    }

    let tokens = establish_session(&state.auth, &user, &mut state.user_store)?;

    Ok(Json(tokens))
}

#[cfg(test)]
mod token_tests {
    use jsonwebtoken::{Header, Validation, decode, encode};
    use time::OffsetDateTime;

    use super::{AccessClaims, issue_token_pair};
    use crate::{AuthConfig, test_utils::test_user};

    #[test]
    fn access_token_round_trips_claims() {
        let auth = AuthConfig::new("access secret", "refresh secret");
        let user = test_user();

        let tokens = issue_token_pair(&auth, &user).unwrap();

        let claims = decode::<AccessClaims>(
            &tokens.access_token,
            auth.access_decoding_key(),
            &Validation::default(),
        )
        .unwrap()
        .claims;

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email.to_string());
        assert_eq!(tokens.expires_in, 3600);
        assert_eq!(tokens.token_type, "Bearer");
    }

    #[test]
    fn access_token_cannot_be_decoded_as_refresh_token() {
        let auth = AuthConfig::new("access secret", "refresh secret");
        let user = test_user();

        let tokens = issue_token_pair(&auth, &user).unwrap();

        let result = decode::<AccessClaims>(
            &tokens.access_token,
            auth.refresh_decoding_key(),
            &Validation::default(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn refresh_tokens_are_unique_per_issue() {
        let auth = AuthConfig::new("access secret", "refresh secret");
        let user = test_user();

        let first = issue_token_pair(&auth, &user).unwrap();
        let second = issue_token_pair(&auth, &user).unwrap();

        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn expired_access_token_is_rejected() {
        let auth = AuthConfig::new("access secret", "refresh secret");
        let user = test_user();
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;

        let claims = AccessClaims {
            sub: user.id,
            email: user.email.to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, auth.access_encoding_key()).unwrap();

        let result = decode::<AccessClaims>(
            &token,
            auth.access_decoding_key(),
            &Validation::default(),
        );

        assert!(result.is_err());
    }
}
