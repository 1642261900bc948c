//! Maps the API's URI endpoints to their route handlers.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::{log_in, refresh, register},
    category::{create_category, delete_category, get_categories, update_category},
    endpoints,
    profile::{get_user, update_profile},
    settings::{get_settings, update_settings},
    stores::{CategoryStore, TransactionStore, UserStore},
    summary::get_summary,
    transaction::{
        clear_transactions, create_transaction, delete_transaction, get_transactions,
        update_transaction,
    },
};

/// Build the API router around `state`.
pub fn build_router<C, T, U>(state: AppState<C, T, U>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::REGISTER, post(register))
        .route(endpoints::LOG_IN, post(log_in))
        .route(endpoints::REFRESH, post(refresh))
        .route(endpoints::USER, get(get_user))
        .route(endpoints::PROFILE, put(update_profile))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions)
                .post(create_transaction)
                .delete(clear_transactions),
        )
        .route(endpoints::SUMMARY, get(get_summary))
        .route(
            endpoints::TRANSACTION,
            put(update_transaction).delete(delete_transaction),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories).post(create_category),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category).delete(delete_category),
        )
        .route(
            endpoints::SETTINGS,
            get(get_settings).put(update_settings),
        )
        .with_state(state)
}
