//! Dashboard aggregation.

use docportal_common::AppResult;
use docportal_db::{
    entities::{
        document_request::{self, RequestStatus},
        user::Role,
    },
    repositories::{DocumentRequestRepository, RequestWithOwner, UserRepository},
};
use serde::{Deserialize, Serialize};

use super::archive::parse_status_filter;
use super::search::{ResidentSummary, SearchService};
use crate::context::{Lang, RequestContext};

/// Per-resident request counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequestCounts {
    pub total: u64,
    pub pending: u64,
    pub completed: u64,
}

impl RequestCounts {
    /// Tally requests by exact status. Other statuses only count toward `total`.
    #[must_use]
    pub fn tally(requests: &[document_request::Model]) -> Self {
        requests.iter().fold(Self::default(), |mut counts, request| {
            counts.total += 1;
            match request.status {
                RequestStatus::Pending => counts.pending += 1,
                RequestStatus::Completed => counts.completed += 1,
                _ => {}
            }
            counts
        })
    }
}

/// A resident's own dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct UserDashboard {
    pub lang: Lang,
    pub counts: RequestCounts,
    pub requests: Vec<document_request::Model>,
}

/// Query for the admin dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminDashboardQuery {
    /// Resident name search.
    pub search: Option<String>,
    /// Exact status filter for the request list.
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// The admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub lang: Lang,
    pub total_users: u64,
    pub total_requests: u64,
    pub status_filter: Option<RequestStatus>,
    pub search_query: String,
    pub requests: Vec<RequestWithOwner>,
    pub residents: Vec<ResidentSummary>,
}

/// Dashboard service. Every call recomputes from current state.
#[derive(Clone)]
pub struct DashboardService {
    request_repo: DocumentRequestRepository,
    user_repo: UserRepository,
    search: SearchService,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(
        request_repo: DocumentRequestRepository,
        user_repo: UserRepository,
        search: SearchService,
    ) -> Self {
        Self {
            request_repo,
            user_repo,
            search,
        }
    }

    /// Counts and request list for the calling resident.
    pub async fn user_dashboard(&self, ctx: &RequestContext) -> AppResult<UserDashboard> {
        let caller = ctx.require_user()?;
        let requests = self.request_repo.find_by_user(&caller.user_id).await?;

        Ok(UserDashboard {
            lang: ctx.lang,
            counts: RequestCounts::tally(&requests),
            requests,
        })
    }

    /// Global counts, the filtered request list and the resident search.
    pub async fn admin_dashboard(
        &self,
        ctx: &RequestContext,
        query: AdminDashboardQuery,
    ) -> AppResult<AdminDashboard> {
        ctx.require_admin()?;
        let status_filter = parse_status_filter(query.status.as_deref())?;
        let search_query = query.search.unwrap_or_default().trim().to_string();

        let requests = self
            .request_repo
            .list_with_owner(status_filter, query.limit, query.offset)
            .await?;
        let total_users = self.user_repo.count_by_role(Role::User).await?;
        let total_requests = self.request_repo.count_all().await?;
        let residents = self.search.search_residents(ctx, &search_query).await?;

        tracing::debug!(
            status = status_filter.map(RequestStatus::as_str),
            search = %search_query,
            count = requests.len(),
            "Admin dashboard computed"
        );

        Ok(AdminDashboard {
            lang: ctx.lang,
            total_users,
            total_requests,
            status_filter,
            search_query,
            requests,
            residents,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::{
        admin_ctx, create_test_request, create_test_user, statement_log, user_ctx,
    };
    use docportal_common::AppError;
    use sea_orm::{DatabaseBackend, MockDatabase, Value, prelude::DateTimeWithTimeZone};
    use std::sync::Arc;

    fn service(db: MockDatabase) -> DashboardService {
        let conn = Arc::new(db.into_connection());
        let users = UserRepository::new(Arc::clone(&conn));
        DashboardService::new(
            DocumentRequestRepository::new(conn),
            users.clone(),
            SearchService::new(users),
        )
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
        maplit::btreemap! { "num_items" => Value::BigInt(Some(n)) }
    }

    #[test]
    fn test_tally_counts_exact_statuses() {
        let requests = vec![
            create_test_request("r1", "u1", RequestStatus::Pending),
            create_test_request("r2", "u1", RequestStatus::Pending),
            create_test_request("r3", "u1", RequestStatus::Completed),
            create_test_request("r4", "u1", RequestStatus::Processing),
            create_test_request("r5", "u1", RequestStatus::Rejected),
        ];

        let counts = RequestCounts::tally(&requests);

        assert_eq!(
            counts,
            RequestCounts {
                total: 5,
                pending: 2,
                completed: 1
            }
        );
    }

    #[tokio::test]
    async fn test_user_dashboard() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
            create_test_request("r2", "u1", RequestStatus::Processing),
            create_test_request("r1", "u1", RequestStatus::Pending),
        ]]));

        let dashboard = svc.user_dashboard(&user_ctx("u1")).await.unwrap();

        assert_eq!(dashboard.counts.total, 2);
        assert_eq!(dashboard.counts.pending, 1);
        assert_eq!(dashboard.counts.completed, 0);
        assert_eq!(dashboard.requests[0].id, "r2");
    }

    #[tokio::test]
    async fn test_admin_dashboard() {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let joined = maplit::btreemap! {
            "id" => Value::from("r1"),
            "user_id" => Value::from("u1"),
            "document_type" => Value::from("Barangay Clearance"),
            "full_name" => Value::from("Juan Dela Cruz"),
            "address" => Value::from("123 Main St"),
            "contact" => Value::from("09171234567"),
            "purpose" => Value::from("Employment"),
            "status" => Value::from("Pending"),
            "created_at" => Value::from(now),
            "owner_fullname" => Value::from("Juan Dela Cruz"),
            "owner_email" => Value::from("u1@example.com"),
        };

        let conn = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[joined]])
                .append_query_results([[count_row(3)]])
                .append_query_results([[count_row(1)]])
                .append_query_results([[create_test_user("u1", true)]])
                .into_connection(),
        );
        let users = UserRepository::new(Arc::clone(&conn));
        let svc = DashboardService::new(
            DocumentRequestRepository::new(Arc::clone(&conn)),
            users.clone(),
            SearchService::new(users),
        );

        let query = AdminDashboardQuery {
            search: Some(" cruz ".to_string()),
            status: Some("Pending".to_string()),
            ..Default::default()
        };
        let dashboard = svc.admin_dashboard(&admin_ctx(), query).await.unwrap();

        assert_eq!(dashboard.total_users, 3);
        assert_eq!(dashboard.total_requests, 1);
        assert_eq!(dashboard.status_filter, Some(RequestStatus::Pending));
        assert_eq!(dashboard.search_query, "cruz");
        assert_eq!(dashboard.requests.len(), 1);
        assert_eq!(dashboard.requests[0].owner_email, "u1@example.com");
        assert_eq!(dashboard.residents.len(), 1);

        drop(svc);
        let log = statement_log(conn);
        assert!(
            log.contains(r#"\"document_request\".\"status\" = $1"#),
            "{log}"
        );
        assert!(log.contains(r#""Pending""#), "{log}");
        assert!(log.contains(r#"\"user\".\"role\" = $1"#), "{log}");
        assert!(log.contains(r#""%cruz%""#), "{log}");
    }

    #[tokio::test]
    async fn test_admin_dashboard_rejects_bad_filter() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres));

        let query = AdminDashboardQuery {
            status: Some("pending".to_string()),
            ..Default::default()
        };
        let result = svc.admin_dashboard(&admin_ctx(), query).await;

        assert!(matches!(result, Err(AppError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn test_admin_dashboard_requires_admin() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = svc
            .admin_dashboard(&user_ctx("u1"), AdminDashboardQuery::default())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
