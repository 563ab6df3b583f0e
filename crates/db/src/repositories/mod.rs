//! Repositories wrapping database access per entity.

mod archive_record;
mod document_request;
mod user;

pub use archive_record::ArchiveRecordRepository;
pub use document_request::{DocumentRequestRepository, RequestWithOwner};
pub use user::UserRepository;

use docportal_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map a write error, surfacing unique-constraint conflicts separately.
pub(crate) fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::IntegrityViolation(detail),
        _ => AppError::Database(err.to_string()),
    }
}

/// Sort and de-duplicate a selection of ids.
pub(crate) fn normalize_ids(ids: &[String]) -> Vec<String> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    ids
}

/// The statements a mock connection received, in `Debug` form.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn statement_log(db: std::sync::Arc<sea_orm::DatabaseConnection>) -> String {
    format!("{:?}", std::sync::Arc::try_unwrap(db).unwrap().into_transaction_log())
}
