//! Resident request endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use docportal_common::AppResult;
use docportal_core::{StatusEntry, SubmitRequestInput};
use docportal_db::entities::document_request;

use crate::{
    extractors::{AppJson, Ctx},
    middleware::AppState,
    response::ApiResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/requests", post(submit))
        .route("/requests/status", get(status_page))
}

/// Submit a document request.
async fn submit(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    AppJson(input): AppJson<SubmitRequestInput>,
) -> AppResult<ApiResponse<document_request::Model>> {
    let request = state.request_service.submit(&ctx, input).await?;
    Ok(ApiResponse::created(request))
}

/// The caller's requests and their statuses, newest first.
async fn status_page(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
) -> AppResult<ApiResponse<Vec<StatusEntry>>> {
    let entries = state.request_service.status_page(&ctx).await?;
    Ok(ApiResponse::ok(entries))
}
