//! Route handlers for creating, listing, updating, and deleting the
//! authenticated user's transactions.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Deserializer, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    AppState, Error,
    auth::{AccessClaims, authenticate},
    models::{DatabaseID, NewTransaction, Transaction, TransactionType, TransactionUpdate},
    stores::{TransactionQuery, TransactionStore, UserStore},
    summary::parse_cutoff,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CreateTransactionRequest {
    description: Option<String>,
    amount: Option<f64>,
    date: Option<String>,
    category: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UpdateTransactionRequest {
    description: Option<String>,
    amount: Option<f64>,
    date: Option<String>,
    category: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    // `deserialize_with` keeps "field absent" distinct from "field null":
    // absent leaves the stored notes alone, null (or empty) clears them.
    #[serde(deserialize_with = "double_option")]
    notes: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TransactionParams {
    #[serde(rename = "type")]
    kind: Option<String>,
    period: Option<String>,
}

/// The number of records removed by a bulk clear.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ClearResult {
    pub deleted: u64,
}

fn parse_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(Error::Validation(
            "amount must be a non-negative number".to_owned(),
        ))
    }
}

fn parse_date(text: &str) -> Result<OffsetDateTime, Error> {
    OffsetDateTime::parse(text, &Rfc3339)
        .map_err(|_| Error::Validation(format!("{text} is not a valid RFC 3339 date")))
}

fn parse_kind(text: &str) -> Result<TransactionType, Error> {
    TransactionType::from_str(text).map_err(|error| Error::Validation(error.to_string()))
}

fn required_text(field: Option<String>, name: &str) -> Result<String, Error> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Validation(format!("{name} is required"))),
    }
}

/// Treat empty or whitespace-only notes as "no notes".
fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes.filter(|text| !text.trim().is_empty())
}

/// A route handler for recording a new transaction for the authenticated
/// user.
pub(crate) async fn create_transaction<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: AccessClaims,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    C: Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;

    let description = required_text(request.description, "description")?;
    let amount = request
        .amount
        .ok_or_else(|| Error::Validation("amount is required".to_owned()))
        .and_then(parse_amount)?;
    let date = request
        .date
        .ok_or_else(|| Error::Validation("date is required".to_owned()))
        .and_then(|text| parse_date(&text))?;
    let category = required_text(request.category, "category")?;
    let kind = request
        .kind
        .ok_or_else(|| Error::Validation("type is required".to_owned()))
        .and_then(|text| parse_kind(&text))?;

    let transaction = state.transaction_store.create(NewTransaction {
        user_id: user.id,
        description,
        amount,
        date,
        category,
        kind,
        notes: normalize_notes(request.notes),
    })?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for listing the authenticated user's transactions,
/// most recent first, optionally filtered by type and reporting period.
pub(crate) async fn get_transactions<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: AccessClaims,
    Query(params): Query<TransactionParams>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    C: Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;

    let kind = match params.kind.as_deref() {
        None | Some("all") => None,
        Some(text) => Some(parse_kind(text)?),
    };
    let cutoff = parse_cutoff(params.period.as_deref())?;

    let transactions = state
        .transaction_store
        .get_query(user.id, TransactionQuery { kind, cutoff })?;

    Ok(Json(transactions))
}

/// A route handler for partially updating one of the authenticated user's
/// transactions.
pub(crate) async fn update_transaction<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: AccessClaims,
    Path(id): Path<DatabaseID>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, Error>
where
    C: Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;

    let update = TransactionUpdate {
        description: request.description,
        amount: request.amount.map(parse_amount).transpose()?,
        date: request
            .date
            .map(|text| parse_date(&text))
            .transpose()?,
        category: request.category,
        kind: request
            .kind
            .map(|text| parse_kind(&text))
            .transpose()?,
        notes: request.notes.map(normalize_notes),
    };

    let transaction = state.transaction_store.update(user.id, id, update)?;

    Ok(Json(transaction))
}

/// A route handler for deleting one of the authenticated user's
/// transactions.
pub(crate) async fn delete_transaction<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: AccessClaims,
    Path(id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    C: Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;
    state.transaction_store.delete(user.id, id)?;

    Ok(StatusCode::NO_CONTENT)
}

/// A route handler for deleting every transaction owned by the
/// authenticated user. Clearing an empty history succeeds with a zero
/// count.
pub(crate) async fn clear_transactions<C, T, U>(
    State(mut state): State<AppState<C, T, U>>,
    claims: AccessClaims,
) -> Result<Json<ClearResult>, Error>
where
    C: Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = authenticate(&claims, &state.user_store)?;
    let deleted = state.transaction_store.delete_all(user.id)?;

    Ok(Json(ClearResult { deleted }))
}
