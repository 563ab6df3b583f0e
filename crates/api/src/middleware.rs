//! API middleware.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use docportal_common::Config;
use docportal_core::{ArchiveService, DashboardService, RequestService, SearchService, UserService};
use docportal_db::repositories::{
    ArchiveRecordRepository, DocumentRequestRepository, UserRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub request_service: RequestService,
    pub archive_service: ArchiveService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let request_repo = DocumentRequestRepository::new(Arc::clone(&db));
        let archive_repo = ArchiveRecordRepository::new(db);

        Self {
            user_service: UserService::new(user_repo.clone()),
            request_service: RequestService::new(request_repo.clone(), user_repo.clone(), config),
            archive_service: ArchiveService::new(archive_repo, request_repo.clone(), config),
            dashboard_service: DashboardService::new(
                request_repo,
                user_repo.clone(),
                SearchService::new(user_repo),
            ),
        }
    }
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to its user and stores it in the request
/// extensions. Unknown tokens leave the request anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token.trim()).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) if e.is_server_error() => {
                tracing::error!(error = %e, "Token lookup failed");
            }
            Err(_) => {
                tracing::debug!("Unknown session token");
            }
        }
    }

    next.run(req).await
}
