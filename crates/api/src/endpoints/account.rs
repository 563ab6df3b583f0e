//! Own-account endpoints.

use axum::{Router, extract::State, routing::get};
use docportal_common::AppResult;
use docportal_core::{Profile, UpdateProfileInput};

use crate::{
    extractors::{AppJson, Ctx},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/account", get(show).put(update))
}

/// The caller's profile and whether it is complete enough to submit requests.
async fn show(State(state): State<AppState>, Ctx(ctx): Ctx) -> AppResult<ApiResponse<Profile>> {
    let profile = state.user_service.profile(&ctx).await?;
    Ok(ApiResponse::ok(profile))
}

async fn update(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    AppJson(input): AppJson<UpdateProfileInput>,
) -> AppResult<ApiResponse<Profile>> {
    let profile = state.user_service.update_profile(&ctx, input).await?;
    Ok(ApiResponse::ok(profile))
}
