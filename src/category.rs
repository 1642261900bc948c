//! Route handlers for listing the merged category namespace and managing
//! the authenticated user's custom categories.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{AccessClaims, authenticate},
    models::{Category, CategoryId, CategoryUpdate, NewCategory, TransactionType},
    stores::{CategoryStore, UserStore},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CategoryParams {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CreateCategoryRequest {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UpdateCategoryRequest {
    name: Option<String>,
    icon: Option<String>,
}

/// The category lists returned when no type filter is given: one grouping
/// per transaction type rather than an interleaved list.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CategoryGroups {
    pub expense: Vec<Category>,
    pub income: Vec<Category>,
}

/// The icon used when a new custom category does not name one.
const DEFAULT_ICON: &str = "pricetag";

fn parse_kind(text: &str) -> Result<TransactionType, Error> {
    TransactionType::from_str(text).map_err(|error| Error::Validation(error.to_string()))
}

/// A route handler for listing categories: built-ins first in their fixed
/// order, then the user's custom categories in insertion order.
///
/// With a `type` filter the response is a single list; without one it is
/// the expense and income groupings side by side.
pub(crate) async fn get_categories<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: AccessClaims,
    Query(params): Query<CategoryParams>,
) -> Result<Response, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;
    let kind = params.kind.as_deref().map(parse_kind).transpose()?;

    let custom = state.category_store.get_by_user(user.id, kind)?;

    let response = match kind {
        Some(kind) => Json(state.catalog.merged(kind, &custom)).into_response(),
        None => Json(CategoryGroups {
            expense: state.catalog.merged(TransactionType::Expense, &custom),
            income: state.catalog.merged(TransactionType::Income, &custom),
        })
        .into_response(),
    };

    Ok(response)
}

/// A route handler for creating a custom category for the authenticated
/// user.
pub(crate) async fn create_category<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: AccessClaims,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;

    let name = match request.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(Error::Validation("name is required".to_owned())),
    };
    let kind = request
        .kind
        .ok_or_else(|| Error::Validation("type is required".to_owned()))
        .and_then(|text| parse_kind(&text))?;
    let icon = request
        .icon
        .filter(|icon| !icon.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ICON.to_owned());

    let category = state.category_store.create(NewCategory {
        user_id: user.id,
        name,
        icon,
        kind,
    })?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// A route handler for renaming a custom category or changing its icon.
///
/// Built-in category IDs fail with [Error::NotFound]: they are fixed and
/// do not belong to any user.
pub(crate) async fn update_category<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: AccessClaims,
    Path(id): Path<CategoryId>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;

    let CategoryId::Custom(id) = id else {
        return Err(Error::NotFound);
    };

    let category = state.category_store.update(
        user.id,
        id,
        CategoryUpdate {
            name: request.name,
            icon: request.icon,
        },
    )?;

    Ok(Json(category))
}

/// A route handler for deleting a custom category. Built-in category IDs
/// fail with [Error::NotFound].
pub(crate) async fn delete_category<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: AccessClaims,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode, Error>
where
    C: CategoryStore + Clone + Send + Sync,
    T: Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;

    let CategoryId::Custom(id) = id else {
        return Err(Error::NotFound);
    };

    state.category_store.delete(user.id, id)?;

    Ok(StatusCode::NO_CONTENT)
}
