//! Archive service.
//!
//! Moving a request into the archive is the only multi-statement write in
//! the portal, so it is the only operation wrapped in a retry policy.

use docportal_common::{AppError, AppResult, Config, IdGenerator};
use docportal_db::{
    entities::{archive_record, document_request::RequestStatus},
    repositories::{ArchiveRecordRepository, DocumentRequestRepository},
};

use crate::context::RequestContext;
use crate::retry::RetryPolicy;

/// Archive service for business logic.
#[derive(Clone)]
pub struct ArchiveService {
    archive_repo: ArchiveRecordRepository,
    request_repo: DocumentRequestRepository,
    retry: RetryPolicy,
    id_gen: IdGenerator,
}

impl ArchiveService {
    /// Create a new archive service.
    #[must_use]
    pub fn new(
        archive_repo: ArchiveRecordRepository,
        request_repo: DocumentRequestRepository,
        config: &Config,
    ) -> Self {
        Self {
            archive_repo,
            request_repo,
            retry: RetryPolicy::from(&config.archive),
            id_gen: IdGenerator::new(),
        }
    }

    /// Archive a request, removing it from active tracking.
    pub async fn archive(
        &self,
        ctx: &RequestContext,
        request_id: &str,
    ) -> AppResult<archive_record::Model> {
        ctx.require_admin()?;

        let record = self
            .retry
            .run("archive_request", || {
                self.archive_repo
                    .archive_request(request_id, self.id_gen.generate())
            })
            .await
            .inspect_err(|e| {
                if e.is_server_error() {
                    tracing::error!(request_id = %request_id, error = %e, "Archival failed");
                }
            })?;

        tracing::info!(
            request_id = %request_id,
            record_id = %record.id,
            status = %record.status,
            "Request archived"
        );
        Ok(record)
    }

    /// Delete a selection of active requests without archiving them.
    pub async fn delete_requests(&self, ctx: &RequestContext, ids: &[String]) -> AppResult<u64> {
        ctx.require_admin()?;
        let ids = non_empty_selection(ids, "requests")?;

        let count = self.request_repo.delete_many(&ids).await?;
        tracing::info!(count, "Deleted document requests");
        Ok(count)
    }

    /// Delete a selection of archive records.
    pub async fn delete_archive_records(
        &self,
        ctx: &RequestContext,
        ids: &[String],
    ) -> AppResult<u64> {
        ctx.require_admin()?;
        let ids = non_empty_selection(ids, "archive records")?;

        let count = self.archive_repo.delete_many(&ids).await?;
        tracing::info!(count, "Deleted archive records");
        Ok(count)
    }

    /// Archive records, optionally narrowed to one exact status.
    pub async fn list_archive(
        &self,
        ctx: &RequestContext,
        status: Option<&str>,
    ) -> AppResult<Vec<archive_record::Model>> {
        ctx.require_admin()?;
        let status = parse_status_filter(status)?;
        self.archive_repo.list(status).await
    }
}

/// Parse an optional status filter. Blank means no filter.
pub(crate) fn parse_status_filter(raw: Option<&str>) -> AppResult<Option<RequestStatus>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some),
    }
}

fn non_empty_selection(ids: &[String], what: &str) -> AppResult<Vec<String>> {
    let ids: Vec<String> = ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    if ids.is_empty() {
        return Err(AppError::EmptySelection(format!("no {what} selected")));
    }
    Ok(ids)
}
