//! Route handlers for reading and updating the authenticated user's
//! profile.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{AccessClaims, SessionResponse, authenticate, establish_session, parse_email},
    models::{ProfileUpdate, UserData},
    stores::UserStore,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ProfileRequest {
    full_name: Option<String>,
    email: Option<String>,
}

/// A route handler for reading the authenticated user's profile.
pub(crate) async fn get_user<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: AccessClaims,
) -> Result<Json<UserData>, Error>
where
    C: Clone + Send + Sync,
    T: Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;

    Ok(Json(UserData::from(&user)))
}

/// A route handler for partially updating the user's name and email.
///
/// Access tokens embed the email, so a fresh token pair is issued with the
/// updated profile. The superseded refresh token is invalidated in the
/// process.
pub(crate) async fn update_profile<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: AccessClaims,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<SessionResponse>, Error>
where
    C: Clone + Send + Sync,
    T: Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;

    let name = match request.full_name {
        None => None,
        Some(name) if !name.trim().is_empty() => Some(name),
        Some(_) => return Err(Error::Validation("fullName must not be empty".to_owned())),
    };
    let email = request
        .email
        .map(|email| parse_email(&email))
        .transpose()?;

    let user = state
        .user_store
        .update_profile(user.id, ProfileUpdate { name, email })?;
    let tokens = establish_session(&state.auth, &user, &mut state.user_store)?;

    Ok(Json(SessionResponse {
        user: UserData::from(&user),
        tokens,
    }))
}
