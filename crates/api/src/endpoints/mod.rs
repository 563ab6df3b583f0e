//! API endpoints.

mod account;
mod admin;
mod auth;
mod dashboard;
mod health;
mod requests;

use axum::{Router, http::Uri};
use docportal_common::AppError;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(account::router())
        .merge(requests::router())
        .merge(dashboard::router())
        .merge(health::router())
        .nest("/admin", admin::router())
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}
