//! Create `document_request` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DocumentRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DocumentRequest::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(DocumentRequest::DocumentType)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DocumentRequest::FullName).string_len(511).not_null())
                    .col(ColumnDef::new(DocumentRequest::Address).text().not_null())
                    .col(ColumnDef::new(DocumentRequest::Contact).string_len(50).not_null())
                    .col(ColumnDef::new(DocumentRequest::Purpose).text().not_null())
                    .col(
                        ColumnDef::new(DocumentRequest::Status)
                            .string_len(32)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(DocumentRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_request_user")
                            .from(DocumentRequest::Table, DocumentRequest::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (per-resident dashboards)
        manager
            .create_index(
                Index::create()
                    .name("idx_document_request_user_id")
                    .table(DocumentRequest::Table)
                    .col(DocumentRequest::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: status (admin filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_document_request_status")
                    .table(DocumentRequest::Table)
                    .col(DocumentRequest::Status)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_document_request_created_at")
                    .table(DocumentRequest::Table)
                    .col(DocumentRequest::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DocumentRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DocumentRequest {
    Table,
    Id,
    UserId,
    DocumentType,
    FullName,
    Address,
    Contact,
    Purpose,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
