use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, borrow_title, create_title, get_title, list_loans, list_open_loans, list_titles,
    return_title, update_quantity, update_title,
};

/// Creates the API router with all catalog and lending endpoints
///
/// Inventory:
/// - POST /titles - Register a title
/// - PATCH /titles/:id - Update bibliographic details
/// - PUT /titles/:id/quantity - Change the number of owned copies
///
/// Lending:
/// - POST /titles/:id/borrow - Borrow one copy
/// - POST /titles/:id/return - Return a borrowed copy
///
/// Queries:
/// - GET /titles - Search titles with pagination
/// - GET /titles/:id - Get title details
/// - GET /titles/:id/loans - Open loans for a title
/// - GET /loans - Loan history, optionally per borrower
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/titles", post(create_title).get(list_titles))
        .route("/titles/:id", get(get_title).patch(update_title))
        .route("/titles/:id/quantity", put(update_quantity))
        .route("/titles/:id/borrow", post(borrow_title))
        .route("/titles/:id/return", post(return_title))
        .route("/titles/:id/loans", get(list_open_loans))
        .route("/loans", get(list_loans))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
