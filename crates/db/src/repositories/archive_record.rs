//! Archive record repository.

use std::sync::Arc;

use crate::entities::{
    ArchiveRecord, DocumentRequest, archive_record,
    document_request::RequestStatus,
};
use chrono::Utc;
use docportal_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IsolationLevel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};

use super::normalize_ids;

/// Postgres error fragments that mean "try the transaction again".
const TRANSIENT_MARKERS: &[&str] = &[
    "40001",
    "40p01",
    "55p03",
    "could not serialize",
    "deadlock detected",
    "lock timeout",
    "canceling statement due to lock timeout",
];

/// Archive record repository for database operations.
#[derive(Clone)]
pub struct ArchiveRecordRepository {
    db: Arc<DatabaseConnection>,
}

impl ArchiveRecordRepository {
    /// Create a new archive record repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an archive record by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<archive_record::Model>> {
        ArchiveRecord::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the archive record taken from a request.
    pub async fn find_by_request_id(
        &self,
        request_id: &str,
    ) -> AppResult<Option<archive_record::Model>> {
        ArchiveRecord::find()
            .filter(archive_record::Column::RequestId.eq(request_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count every archive record.
    pub async fn count_all(&self) -> AppResult<u64> {
        ArchiveRecord::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Archive records, most recently archived first.
    pub async fn list(
        &self,
        status: Option<RequestStatus>,
    ) -> AppResult<Vec<archive_record::Model>> {
        let mut query = ArchiveRecord::find();

        if let Some(status) = status {
            query = query.filter(archive_record::Column::Status.eq(status));
        }

        query
            .order_by_desc(archive_record::Column::ArchivedAt)
            .order_by_desc(archive_record::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a set of archive records in one statement.
    ///
    /// Duplicate ids are ignored. Returns the number of rows removed.
    pub async fn delete_many(&self, ids: &[String]) -> AppResult<u64> {
        let ids = normalize_ids(ids);
        if ids.is_empty() {
            return Ok(0);
        }

        ArchiveRecord::delete_many()
            .filter(archive_record::Column::Id.is_in(ids))
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Move a request into the archive.
    ///
    /// Reads the request under a row lock, inserts its snapshot as
    /// `record_id`, then deletes the request, all inside one serializable
    /// transaction. Either both writes land or neither does.
    ///
    /// Fails with `RequestNotFound` if the request is absent and with
    /// `TransactionFailure` for conflicts the caller may retry.
    pub async fn archive_request(
        &self,
        request_id: &str,
        record_id: String,
    ) -> AppResult<archive_record::Model> {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await
            .map_err(classify_txn_err)?;

        match Self::archive_in(&txn, request_id, record_id).await {
            Ok(record) => {
                txn.commit().await.map_err(classify_txn_err)?;
                Ok(record)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(
                        request_id = %request_id,
                        error = %rollback_err,
                        "Archive rollback failed"
                    );
                }
                Err(err)
            }
        }
    }

    async fn archive_in(
        txn: &DatabaseTransaction,
        request_id: &str,
        record_id: String,
    ) -> AppResult<archive_record::Model> {
        let request = DocumentRequest::find_by_id(request_id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(classify_txn_err)?
            .ok_or_else(|| AppError::RequestNotFound(request_id.to_string()))?;

        let record = archive_record::ActiveModel {
            id: Set(record_id),
            request_id: Set(request.id.clone()),
            user_id: Set(request.user_id.clone()),
            fullname: Set(request.full_name.clone()),
            document_type: Set(request.document_type.clone()),
            status: Set(request.status),
            date_submitted: Set(request.created_at),
            archived_at: Set(Utc::now().into()),
        }
        .insert(txn)
        .await
        .map_err(classify_txn_err)?;

        let deleted = DocumentRequest::delete_by_id(request_id)
            .exec(txn)
            .await
            .map_err(classify_txn_err)?;

        if deleted.rows_affected != 1 {
            return Err(AppError::TransactionFailure(format!(
                "expected to delete 1 request, deleted {}",
                deleted.rows_affected
            )));
        }

        Ok(record)
    }
}

/// Classify an error raised inside the archival transaction.
///
/// Serialization failures, deadlocks, lock timeouts and a racing insert of
/// the same snapshot are transient. Everything else is a plain database error.
fn classify_txn_err(err: DbErr) -> AppError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return AppError::TransactionFailure(err.to_string());
    }

    let message = err.to_string();
    let lowered = message.to_lowercase();
    if TRANSIENT_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        AppError::TransactionFailure(message)
    } else {
        AppError::Database(message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::document_request;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_request(id: &str, status: RequestStatus) -> document_request::Model {
        document_request::Model {
            id: id.to_string(),
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

    fn snapshot_of(request: &document_request::Model, record_id: &str) -> archive_record::Model {
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

    #[test]
    fn test_classify_transient_errors() {
        let err = classify_txn_err(DbErr::Custom(
            "could not serialize access due to concurrent update".to_string(),
        ));
        assert!(matches!(err, AppError::TransactionFailure(_)));
        assert!(err.is_retryable());

        let err = classify_txn_err(DbErr::Custom("deadlock detected".to_string()));
        assert!(err.is_retryable());

        let err = classify_txn_err(DbErr::Custom("relation does not exist".to_string()));
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_archive_request_moves_snapshot() {
        let request = create_test_request("r1", RequestStatus::Processing);
        let snapshot = snapshot_of(&request, "a1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[request.clone()]])
                .append_query_results([[snapshot]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ArchiveRecordRepository::new(db);
        let record = repo.archive_request("r1", "a1".to_string()).await.unwrap();

        assert_eq!(record.request_id, "r1");
        assert_eq!(record.status, RequestStatus::Processing);
        assert_eq!(record.fullname, request.full_name);
        assert_eq!(record.date_submitted, request.created_at);
    }

    #[tokio::test]
    async fn test_archive_request_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<document_request::Model>::new()])
                .into_connection(),
        );

        let repo = ArchiveRecordRepository::new(db);
        let result = repo.archive_request("missing", "a1".to_string()).await;

        assert!(matches!(result, Err(AppError::RequestNotFound(_))));
    }

    #[tokio::test]
    async fn test_archive_request_delete_mismatch_fails() {
        let request = create_test_request("r1", RequestStatus::Pending);
        let snapshot = snapshot_of(&request, "a1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[request]])
                .append_query_results([[snapshot]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ArchiveRecordRepository::new(db);
        let result = repo.archive_request("r1", "a1".to_string()).await;

        assert!(matches!(result, Err(AppError::TransactionFailure(_))));
    }

    #[tokio::test]
    async fn test_list_archive() {
        let request = create_test_request("r1", RequestStatus::Completed);
        let record = snapshot_of(&request, "a1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[record]])
                .into_connection(),
        );

        let repo = ArchiveRecordRepository::new(db);
        let records = repo.list(Some(RequestStatus::Completed)).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, RequestStatus::Completed);
    }

    #[tokio::test]
    async fn test_delete_many() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = ArchiveRecordRepository::new(db);
        let ids = vec!["a1".to_string(), "a2".to_string()];

        assert_eq!(repo.delete_many(&ids).await.unwrap(), 2);
    }
}
