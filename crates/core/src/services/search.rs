//! Resident search.

use docportal_common::AppResult;
use docportal_db::{entities::user, repositories::UserRepository};
use serde::Serialize;

use crate::context::RequestContext;

/// A resident as listed in admin search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidentSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub fullname: String,
    pub email: String,
}

impl From<user::Model> for ResidentSummary {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            fullname: user.fullname,
            email: user.email,
        }
    }
}

/// Search service over resident accounts.
#[derive(Clone)]
pub struct SearchService {
    user_repo: UserRepository,
}

impl SearchService {
    /// Create a new search service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Residents whose first, last or full name contains `query`,
    /// ignoring case. An empty query lists every resident.
    pub async fn search_residents(
        &self,
        ctx: &RequestContext,
        query: &str,
    ) -> AppResult<Vec<ResidentSummary>> {
        ctx.require_admin()?;
        let residents = self.user_repo.search_residents(query).await?;
        Ok(residents.into_iter().map(ResidentSummary::from).collect())
    }
}
