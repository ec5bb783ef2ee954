//! Create `financial_operation` table.
//!
//! One row per recorded operation; ids come from the database sequence.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FinancialOperation::Table)
                    .if_not_exists()
                    .col(integer(FinancialOperation::Id).primary_key().auto_increment())
                    .col(string_len(FinancialOperation::OperationType, 50).not_null())
                    .col(double(FinancialOperation::Amount).not_null())
                    .col(timestamp_with_time_zone(FinancialOperation::OccurredAt).not_null())
                    .col(
                        ColumnDef::new(FinancialOperation::Description)
                            .string_len(200)
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FinancialOperation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FinancialOperation { Table, Id, OperationType, Amount, OccurredAt, Description }
