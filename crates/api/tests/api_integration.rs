//! API integration tests.
//!
//! Drive the router end to end over a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware,
};
use chrono::Utc;
use docportal_api::{AppState, middleware::auth_middleware, router as api_router};
use docportal_common::config::{
    AdminConfig, ArchiveConfig, Config, DatabaseConfig, RequestsConfig, ServerConfig,
};
use docportal_db::entities::{
    archive_record,
    document_request::{self, RequestStatus},
    user::{self, Role},
};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::Value;
use tower::ServiceExt;

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        admin: AdminConfig {
            email: "adminsislc@domain.com".to_string(),
            password: "admin-password".to_string(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            contact: "09123456789".to_string(),
        },
        archive: ArchiveConfig {
            max_retries: 1,
            initial_delay_ms: 1,
            max_delay_ms: 1,
            multiplier: 1.0,
        },
        requests: RequestsConfig::default(),
    }
}

/// Create the test router over a prepared mock database.
fn create_test_router(db: MockDatabase) -> Router {
    let state = AppState::new(Arc::new(db.into_connection()), &create_test_config());
    api_router()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn test_user(id: &str, role: Role, complete: bool) -> user::Model {
    let filled = |v: &str| complete.then(|| v.to_string());
    user::Model {
        id: id.to_string(),
        first_name: "Juan".to_string(),
        last_name: "Dela Cruz".to_string(),
        fullname: "Juan Dela Cruz".to_string(),
        email: format!("{id}@example.com"),
        password_hash: String::new(),
        token: Some(format!("token-{id}")),
        role,
        contact: None,
        birthdate: filled("1990-01-01"),
        civil_status: filled("Single"),
        address: filled("123 Main St"),
        fathers_name: None,
        mothers_name: None,
        birthplace: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_request(status: RequestStatus) -> document_request::Model {
    document_request::Model {
        id: "r1".to_string(),
        user_id: "u1".to_string(),
        document_type: "Barangay Clearance".to_string(),
        full_name: "Juan Dela Cruz".to_string(),
        address: "123 Main St".to_string(),
        contact: "09171234567".to_string(),
        purpose: "Employment".to_string(),
        status,
        created_at: Utc::now().into(),
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(Request::builder().uri("/nonexistent").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["severity"], "warning");
}

#[tokio::test]
async fn test_unknown_admin_endpoint_returns_404() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(Request::builder().uri("/admin/nonexistent").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_admin_dashboard_requires_auth() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(Request::builder().uri("/admin/dashboard").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["severity"], "error");
}

#[tokio::test]
async fn test_resident_cannot_bulk_delete() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u1", Role::User, true)]]),
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/requests/delete",
            Some("token-u1"),
            r#"{"ids":["r1"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_submit_with_incomplete_profile() {
    let resident = test_user("u1", Role::User, false);
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[resident.clone()]])
            .append_query_results([[resident]]),
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/requests",
            Some("token-u1"),
            r#"{"document_type":"Barangay Clearance","full_name":"Juan Dela Cruz","address":"123 Main St","contact":"09171234567","purpose":"Employment"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "PROFILE_INCOMPLETE");
    assert_eq!(body["error"]["severity"], "warning");
}

#[tokio::test]
async fn test_submit_creates_request() {
    let resident = test_user("u1", Role::User, true);
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[resident.clone()]])
            .append_query_results([[resident]])
            .append_query_results([[test_request(RequestStatus::Pending)]]),
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/requests",
            Some("token-u1"),
            r#"{"document_type":"Barangay Clearance","full_name":"Juan Dela Cruz","address":"123 Main St","contact":"09171234567","purpose":"Employment"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "Pending");
}

#[tokio::test]
async fn test_set_status_rejects_unknown_value() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("a1", Role::Admin, false)]]),
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/requests/r1/status",
            Some("token-a1"),
            r#"{"status":"Unknown"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_STATUS");
}

#[tokio::test]
async fn test_set_status_accepts_ready_to_be_claimed() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("a1", Role::Admin, false)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/requests/r1/status",
            Some("token-a1"),
            r#"{"status":"Ready to be Claimed"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "Ready to be Claimed");
}

#[tokio::test]
async fn test_archive_request() {
    let request = test_request(RequestStatus::Verifying);
    let record = archive_record::Model {
        id: "a1".to_string(),
        request_id: request.id.clone(),
        user_id: request.user_id.clone(),
        fullname: request.full_name.clone(),
        document_type: request.document_type.clone(),
        status: request.status,
        date_submitted: request.created_at,
        archived_at: Utc::now().into(),
    };
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("a1", Role::Admin, false)]])
            .append_query_results([[request]])
            .append_query_results([[record]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
    );

    let response = app
        .oneshot(json_request("DELETE", "/admin/requests/r1", Some("token-a1"), ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["request_id"], "r1");
    assert_eq!(body["data"]["status"], "Verifying");
}

#[tokio::test]
async fn test_archive_missing_request_is_warning() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("a1", Role::Admin, false)]])
            .append_query_results([Vec::<document_request::Model>::new()]),
    );

    let response = app
        .oneshot(json_request("DELETE", "/admin/requests/missing", Some("token-a1"), ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "REQUEST_NOT_FOUND");
    assert_eq!(body["error"]["severity"], "warning");
}

#[tokio::test]
async fn test_bulk_delete_empty_selection() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("a1", Role::Admin, false)]]),
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/records/delete",
            Some("token-a1"),
            r#"{"ids":[]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "EMPTY_SELECTION");
}

#[tokio::test]
async fn test_user_dashboard_counts() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u1", Role::User, true)]])
            .append_query_results([[
                test_request(RequestStatus::Pending),
                test_request(RequestStatus::Completed),
                test_request(RequestStatus::Processing),
            ]]),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard?lang=tl")
                .header(header::AUTHORIZATION, "Bearer token-u1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["lang"], "tl");
    assert_eq!(body["data"]["counts"]["total"], 3);
    assert_eq!(body["data"]["counts"]["pending"], 1);
    assert_eq!(body["data"]["counts"]["completed"], 1);
}

#[tokio::test]
async fn test_register_with_invalid_json_returns_bad_request() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(json_request("POST", "/auth/register", None, "not valid json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["severity"], "warning");
}

#[tokio::test]
async fn test_set_status_with_missing_field_returns_bad_request() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("a1", Role::Admin, false)]]),
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/requests/r1/status",
            Some("token-a1"),
            r#"{"state":"Pending"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}
