//! Create `audit_entry` table.
//!
//! Append-only change log. `operation_id` deliberately carries no foreign key:
//! entries must survive deletion of the operation they describe.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditEntry::Table)
                    .if_not_exists()
                    .col(integer(AuditEntry::Id).primary_key().auto_increment())
                    .col(integer(AuditEntry::OperationId).not_null())
                    .col(timestamp_with_time_zone(AuditEntry::Timestamp).not_null())
                    .col(string_len(AuditEntry::ChangeKind, 16).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AuditEntry::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AuditEntry { Table, Id, OperationId, Timestamp, ChangeKind }
