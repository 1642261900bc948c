//! Route handlers for reading and updating the authenticated user's
//! display settings.

use std::str::FromStr;

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{AccessClaims, authenticate},
    models::{Currency, Settings, SettingsUpdate},
    stores::UserStore,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SettingsRequest {
    dark_mode: Option<bool>,
    currency: Option<String>,
    monthly_budget: Option<f64>,
}

/// A route handler for reading the user's settings with defaults applied.
pub(crate) async fn get_settings<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: AccessClaims,
) -> Result<Json<Settings>, Error>
where
    C: Clone + Send + Sync,
    T: Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;

    Ok(Json(Settings::from(&user)))
}

/// A route handler for partially updating the user's settings.
///
/// The currency may be given as a code or a symbol; either way it is
/// stored and read back as its code. An unrecognized currency or a
/// negative budget fails with [Error::Validation] and changes nothing.
pub(crate) async fn update_settings<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: AccessClaims,
    Json(request): Json<SettingsRequest>,
) -> Result<Json<Settings>, Error>
where
    C: Clone + Send + Sync,
    T: Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;

    let currency = request
        .currency
        .map(|text| {
            Currency::from_str(&text).map_err(|error| Error::Validation(error.to_string()))
        })
        .transpose()?;

    let monthly_budget = request
        .monthly_budget
        .map(|budget| {
            if budget.is_finite() && budget >= 0.0 {
                Ok(budget)
            } else {
                Err(Error::Validation(
                    "monthlyBudget must be a non-negative number".to_owned(),
                ))
            }
        })
        .transpose()?;

    let user = state.user_store.update_settings(
        user.id,
        SettingsUpdate {
            dark_mode: request.dark_mode,
            currency,
            monthly_budget,
        },
    )?;

    Ok(Json(Settings::from(&user)))
}
