//! HTTP API layer for the document portal.
//!
//! - **Endpoints**: JSON routes for residents and administrators
//! - **Extractors**: caller context from the session and language
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
