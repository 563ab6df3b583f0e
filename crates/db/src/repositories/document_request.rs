//! Document request repository.

use std::sync::Arc;

use crate::entities::{
    DocumentRequest,
    document_request::{self, RequestStatus},
    user,
};
use docportal_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    prelude::DateTimeWithTimeZone, sea_query::Expr,
};
use serde::Serialize;

use super::{map_write_err, normalize_ids};

/// A document request joined with its owner's name and email.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct RequestWithOwner {
    pub id: String,
    pub user_id: String,
    pub document_type: String,
    pub full_name: String,
    pub address: String,
    pub contact: String,
    pub purpose: String,
    pub status: RequestStatus,
    pub created_at: DateTimeWithTimeZone,
    pub owner_fullname: String,
    pub owner_email: String,
}

/// Document request repository for database operations.
#[derive(Clone)]
pub struct DocumentRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl DocumentRequestRepository {
    /// Create a new document request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a request by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<document_request::Model>> {
        DocumentRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a request by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<document_request::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RequestNotFound(id.to_string()))
    }

    /// Create a new request.
    pub async fn create(
        &self,
        model: document_request::ActiveModel,
    ) -> AppResult<document_request::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// All requests owned by a user, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<document_request::Model>> {
        DocumentRequest::find()
            .filter(document_request::Column::UserId.eq(user_id))
            .order_by_desc(document_request::Column::CreatedAt)
            .order_by_desc(document_request::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count every active request.
    pub async fn count_all(&self) -> AppResult<u64> {
        DocumentRequest::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Active requests joined with their owners, newest first.
    pub async fn list_with_owner(
        &self,
        status: Option<RequestStatus>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> AppResult<Vec<RequestWithOwner>> {
        let mut query = DocumentRequest::find()
            .select_only()
            .columns([
                document_request::Column::Id,
                document_request::Column::UserId,
                document_request::Column::DocumentType,
                document_request::Column::FullName,
                document_request::Column::Address,
                document_request::Column::Contact,
                document_request::Column::Purpose,
                document_request::Column::Status,
                document_request::Column::CreatedAt,
            ])
            .column_as(user::Column::Fullname, "owner_fullname")
            .column_as(user::Column::Email, "owner_email")
            .join(JoinType::InnerJoin, document_request::Relation::User.def());

        if let Some(status) = status {
            query = query.filter(document_request::Column::Status.eq(status));
        }

        query
            .order_by_desc(document_request::Column::CreatedAt)
            .order_by_desc(document_request::Column::Id)
            .limit(limit)
            .offset(offset)
            .into_model::<RequestWithOwner>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overwrite a request's status.
    ///
    /// Returns the number of rows touched (0 when the request is gone).
    pub async fn update_status(&self, id: &str, status: RequestStatus) -> AppResult<u64> {
        DocumentRequest::update_many()
            .col_expr(document_request::Column::Status, Expr::value(status.as_str()))
            .filter(document_request::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Set a request's status only if it still holds `expected`.
    ///
    /// Returns 0 when the request is gone or another writer got there first.
    pub async fn compare_and_set_status(
        &self,
        id: &str,
        expected: RequestStatus,
        status: RequestStatus,
    ) -> AppResult<u64> {
        DocumentRequest::update_many()
            .col_expr(document_request::Column::Status, Expr::value(status.as_str()))
            .filter(document_request::Column::Id.eq(id))
            .filter(document_request::Column::Status.eq(expected))
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a set of requests in one statement.
    ///
    /// Duplicate ids are ignored. Returns the number of rows removed.
    pub async fn delete_many(&self, ids: &[String]) -> AppResult<u64> {
        let ids = normalize_ids(ids);
        if ids.is_empty() {
            return Ok(0);
        }

        DocumentRequest::delete_many()
            .filter(document_request::Column::Id.is_in(ids))
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
