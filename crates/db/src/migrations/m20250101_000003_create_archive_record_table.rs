//! Create `archive_record` table migration.
//!
//! No foreign keys: records outlive both the request and its owner.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ArchiveRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ArchiveRecord::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ArchiveRecord::RequestId).string_len(32).not_null())
                    .col(ColumnDef::new(ArchiveRecord::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(ArchiveRecord::Fullname).string_len(511).not_null())
                    .col(
                        ColumnDef::new(ArchiveRecord::DocumentType)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ArchiveRecord::Status).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ArchiveRecord::DateSubmitted)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArchiveRecord::ArchivedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: request_id (a request is archived at most once)
        manager
            .create_index(
                Index::create()
                    .name("idx_archive_record_request_id")
                    .table(ArchiveRecord::Table)
                    .col(ArchiveRecord::RequestId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: status (filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_archive_record_status")
                    .table(ArchiveRecord::Table)
                    .col(ArchiveRecord::Status)
                    .to_owned(),
            )
            .await?;

        // Index: archived_at
        manager
            .create_index(
                Index::create()
                    .name("idx_archive_record_archived_at")
                    .table(ArchiveRecord::Table)
                    .col(ArchiveRecord::ArchivedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArchiveRecord::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ArchiveRecord {
    Table,
    Id,
    RequestId,
    UserId,
    Fullname,
    DocumentType,
    Status,
    DateSubmitted,
    ArchivedAt,
}
