//! Authentication endpoints.

use axum::{Router, extract::State, response::IntoResponse, routing::post};
use docportal_common::AppResult;
use docportal_core::{RegisterInput, Session, SignInInput};

use crate::{
    extractors::{AppJson, Ctx},
    middleware::AppState,
    response::{ApiResponse, ok},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/signin", post(signin))
        .route("/auth/signout", post(signout))
}

/// Create a resident account and sign it in.
async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterInput>,
) -> AppResult<ApiResponse<Session>> {
    let session = state.user_service.register(input).await?;
    Ok(ApiResponse::created(session))
}

/// Sign in to an existing account.
async fn signin(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignInInput>,
) -> AppResult<ApiResponse<Session>> {
    let session = state.user_service.signin(input).await?;
    Ok(ApiResponse::ok(session))
}

/// Invalidate the current token.
async fn signout(State(state): State<AppState>, Ctx(ctx): Ctx) -> AppResult<impl IntoResponse> {
    state.user_service.signout(&ctx).await?;
    Ok(ok())
}
