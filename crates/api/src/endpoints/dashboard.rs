//! Resident dashboard endpoint.

use axum::{Router, extract::State, routing::get};
use docportal_common::AppResult;
use docportal_core::UserDashboard;

use crate::{extractors::Ctx, middleware::AppState, response::ApiResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(user_dashboard))
}

async fn user_dashboard(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
) -> AppResult<ApiResponse<UserDashboard>> {
    let dashboard = state.dashboard_service.user_dashboard(&ctx).await?;
    Ok(ApiResponse::ok(dashboard))
}
