//! Derives a financial summary (balance, totals, per-category expense
//! breakdown) from a user's transactions over a reporting period.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::{AccessClaims, authenticate},
    models::{Transaction, TransactionType},
    stores::{TransactionQuery, TransactionStore, UserStore},
};

/// The error returned when a string does not name a reporting period.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("{0} is not a valid period, expected 'week', 'month' or 'year'")]
pub struct ParsePeriodError(pub String);

/// A reporting window stretching back from the current moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The last seven days.
    Week,
    /// The last calendar month.
    Month,
    /// The last calendar year.
    Year,
}

impl Period {
    /// The inclusive lower bound of this period, measured back from `now`.
    ///
    /// Months and years step back by calendar unit rather than a fixed
    /// number of days, clamping the day of month where the target month is
    /// shorter (e.g. March 31st looks back to the last day of February).
    pub fn cutoff(&self, now: OffsetDateTime) -> OffsetDateTime {
        match self {
            Period::Week => now - Duration::days(7),
            Period::Month => {
                let date = now.date();
                let (year, month) = match date.month() {
                    Month::January => (date.year() - 1, Month::December),
                    month => (date.year(), month.previous()),
                };

                replace_clamped(now, year, month)
            }
            Period::Year => {
                let date = now.date();

                replace_clamped(now, date.year() - 1, date.month())
            }
        }
    }
}

/// Move `now` to `month` of `year`, clamping the day of month to the target
/// month's length. The clamp makes the date construction infallible.
fn replace_clamped(now: OffsetDateTime, year: i32, month: Month) -> OffsetDateTime {
    let day = now.date().day().min(month.length(year));

    Date::from_calendar_date(year, month, day)
        .map(|date| now.replace_date(date))
        .unwrap_or(now)
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(ParsePeriodError(other.to_owned())),
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        };

        write!(f, "{text}")
    }
}

/// Parse an optional `period` query parameter into a cutoff timestamp.
///
/// An absent period places no lower bound. An unrecognized period fails
/// with [Error::Validation].
pub(crate) fn parse_cutoff(period: Option<&str>) -> Result<Option<OffsetDateTime>, Error> {
    period
        .map(|text| {
            Period::from_str(text)
                .map(|period| period.cutoff(OffsetDateTime::now_utc()))
                .map_err(|error| Error::Validation(error.to_string()))
        })
        .transpose()
}

/// The aggregate financial position derived from a set of transactions.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Total income minus total expense.
    pub balance: f64,
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expense: f64,
    /// Expense totals keyed by category identifier. Income is deliberately
    /// not broken out, and a category appears only once a transaction
    /// contributes to it.
    pub categories: BTreeMap<String, f64>,
}

impl Summary {
    /// Aggregate `transactions` into a summary. Order does not affect the
    /// result beyond floating-point rounding.
    pub fn compute<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = Summary::default();

        for transaction in transactions {
            match transaction.kind {
                TransactionType::Income => {
                    summary.income += transaction.amount;
                    summary.balance += transaction.amount;
                }
                TransactionType::Expense => {
                    summary.expense += transaction.amount;
                    summary.balance -= transaction.amount;
                    *summary
                        .categories
                        .entry(transaction.category.clone())
                        .or_insert(0.0) += transaction.amount;
                }
            }
        }

        summary
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SummaryParams {
    period: Option<String>,
}

/// A route handler for computing the authenticated user's summary over an
/// optional reporting period.
pub(crate) async fn get_summary<C, T, U>(
    State(state): State<AppState<C, T, U>>,
    claims: AccessClaims,
    Query(params): Query<SummaryParams>,
) -> Result<Json<Summary>, Error>
where
    C: Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let cutoff = parse_cutoff(params.period.as_deref())?;
    let user = authenticate(&claims, &state.user_store)?;

    let transactions = state
        .transaction_store
        .get_query(user.id, TransactionQuery { kind: None, cutoff })?;

    Ok(Json(Summary::compute(&transactions)))
}
