//! Fintrack is a personal finance tracking backend.
//!
//! This library provides a JSON REST API for registering users, recording
//! income and expense transactions, organizing them into categories, and
//! deriving simple financial summaries.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

pub mod auth;
mod catalog;
mod category;
pub mod db;
pub mod endpoints;
mod error;
pub mod models;
mod profile;
mod routes;
mod settings;
mod state;
pub mod stores;
pub mod summary;
#[cfg(test)]
mod test_utils;
mod transaction;

pub use catalog::Catalog;
pub use error::Error;
pub use routes::build_router;
pub use state::{AppState, AuthConfig};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
