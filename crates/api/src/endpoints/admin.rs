//! Administrator endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post},
};
use docportal_common::AppResult;
use docportal_core::{AdminDashboard, AdminDashboardQuery, Profile};
use docportal_db::entities::{archive_record, document_request::RequestStatus};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AppJson, Ctx},
    middleware::AppState,
    response::{ApiResponse, DeletedResponse, ok},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/requests/delete", post(delete_requests))
        .route("/requests/{id}/status", post(set_status))
        .route("/requests/{id}", delete(archive_request))
        .route("/records", get(list_records))
        .route("/records/delete", post(delete_records))
        .route("/users/{id}", get(view_user).delete(delete_user))
}

/// Status update request.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// Status update response.
#[derive(Debug, Serialize)]
pub struct SetStatusResponse {
    pub id: String,
    pub status: RequestStatus,
}

/// A selection of ids for a bulk operation.
#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

/// Archive listing filter.
#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub status: Option<String>,
}

/// Counts, the request list and resident search.
async fn dashboard(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Query(query): Query<AdminDashboardQuery>,
) -> AppResult<ApiResponse<AdminDashboard>> {
    let dashboard = state.dashboard_service.admin_dashboard(&ctx, query).await?;
    Ok(ApiResponse::ok(dashboard))
}

async fn set_status(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
    AppJson(req): AppJson<SetStatusRequest>,
) -> AppResult<ApiResponse<SetStatusResponse>> {
    let status = state
        .request_service
        .set_status(&ctx, &id, &req.status)
        .await?;
    Ok(ApiResponse::ok(SetStatusResponse { id, status }))
}

/// Move a request into the archive.
async fn archive_request(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<archive_record::Model>> {
    let record = state.archive_service.archive(&ctx, &id).await?;
    Ok(ApiResponse::ok(record))
}

async fn delete_requests(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    AppJson(req): AppJson<SelectionRequest>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    let deleted = state.archive_service.delete_requests(&ctx, &req.ids).await?;
    Ok(ApiResponse::ok(DeletedResponse { deleted }))
}

async fn list_records(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Query(query): Query<RecordsQuery>,
) -> AppResult<ApiResponse<Vec<archive_record::Model>>> {
    let records = state
        .archive_service
        .list_archive(&ctx, query.status.as_deref())
        .await?;
    Ok(ApiResponse::ok(records))
}

async fn delete_records(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    AppJson(req): AppJson<SelectionRequest>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    let deleted = state
        .archive_service
        .delete_archive_records(&ctx, &req.ids)
        .await?;
    Ok(ApiResponse::ok(DeletedResponse { deleted }))
}

async fn view_user(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Profile>> {
    let profile = state.user_service.view_user(&ctx, &id).await?;
    Ok(ApiResponse::ok(profile))
}

async fn delete_user(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.user_service.delete_user(&ctx, &id).await?;
    Ok(ok())
}
