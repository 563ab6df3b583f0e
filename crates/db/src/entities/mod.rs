//! Database entities.

pub mod archive_record;
pub mod document_request;
pub mod user;

pub use archive_record::Entity as ArchiveRecord;
pub use document_request::Entity as DocumentRequest;
pub use user::Entity as User;
