//! Shared fixtures for service tests.

use chrono::Utc;
use docportal_common::{
    Config,
    config::{AdminConfig, ArchiveConfig, DatabaseConfig, RequestsConfig, ServerConfig},
};
use docportal_db::entities::{
    archive_record,
    document_request::{self, RequestStatus},
    user::{self, Role},
};

use crate::context::{CallerIdentity, Lang, RequestContext};

/// The statements a mock connection received, in `Debug` form.
#[allow(clippy::unwrap_used)]
pub fn statement_log(db: std::sync::Arc<sea_orm::DatabaseConnection>) -> String {
    format!("{:?}", std::sync::Arc::try_unwrap(db).unwrap().into_transaction_log())
}

pub fn test_config() -> Config {
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
            max_retries: 3,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            multiplier: 2.0,
        },
        requests: RequestsConfig::default(),
    }
}

pub fn user_ctx(user_id: &str) -> RequestContext {
    RequestContext::authenticated(
        Lang::En,
        CallerIdentity {
            user_id: user_id.to_string(),
            role: Role::User,
        },
    )
}

pub fn admin_ctx() -> RequestContext {
    RequestContext::authenticated(
        Lang::En,
        CallerIdentity {
            user_id: "admin".to_string(),
            role: Role::Admin,
        },
    )
}

pub fn create_test_user(id: &str, profile_complete: bool) -> user::Model {
    let filled = |value: &str| profile_complete.then(|| value.to_string());
    user::Model {
        id: id.to_string(),
        first_name: "Juan".to_string(),
        last_name: "Dela Cruz".to_string(),
        fullname: "Juan Dela Cruz".to_string(),
        email: format!("{id}@example.com"),
        password_hash: String::new(),
        token: None,
        role: Role::User,
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

pub fn create_test_request(id: &str, user_id: &str, status: RequestStatus) -> document_request::Model {
    document_request::Model {
        id: id.to_string(),
        user_id: user_id.to_string(),
        document_type: "Barangay Clearance".to_string(),
        full_name: "Juan Dela Cruz".to_string(),
        address: "123 Main St".to_string(),
        contact: "09171234567".to_string(),
        purpose: "Employment".to_string(),
        status,
        created_at: Utc::now().into(),
    }
}

pub fn snapshot_of(request: &document_request::Model, record_id: &str) -> archive_record::Model {
    archive_record::Model {
        id: record_id.to_string(),
        request_id: request.id.clone(),
        user_id: request.user_id.clone(),
        fullname: request.full_name.clone(),
        document_type: request.document_type.clone(),
        status: request.status,
        date_submitted: request.created_at,
        archived_at: Utc::now().into(),
    }
}
