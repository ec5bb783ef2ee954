use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // FinancialOperation: exact-match filter on type
        manager
            .create_index(
                Index::create()
                    .name("idx_operation_type")
                    .table(FinancialOperation::Table)
                    .col(FinancialOperation::OperationType)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_operation_occurred_at")
                    .table(FinancialOperation::Table)
                    .col(FinancialOperation::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // AuditEntry: history lookups by operation
        manager
            .create_index(
                Index::create()
                    .name("idx_audit_operation")
                    .table(AuditEntry::Table)
                    .col(AuditEntry::OperationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_audit_operation").table(AuditEntry::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_operation_occurred_at").table(FinancialOperation::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_operation_type").table(FinancialOperation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FinancialOperation { Table, OperationType, OccurredAt }

#[derive(DeriveIden)]
enum AuditEntry { Table, OperationId }
