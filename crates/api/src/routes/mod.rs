//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod consumers;
pub mod health;
pub mod transactions;

/// Creates the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(consumers::routes())
        .merge(transactions::routes())
}

#[cfg(test)]
pub(crate) mod test_support;
