use chrono::Utc;
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use models::financial_operation::{self, Column, Entity};

use crate::audit::{self, AuditEntry, ChangeKind};
use crate::errors::ServiceError;
use crate::operations::domain::{NewOperation, Operation, OperationChanges, OperationFilter};
use crate::operations::repository::OperationRepository;
use crate::pagination::Pagination;

pub struct SeaOrmOperationRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmOperationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn begin(&self) -> Result<DatabaseTransaction, ServiceError> {
        self.db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))
    }
}

async fn commit(txn: DatabaseTransaction) -> Result<(), ServiceError> {
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))
}

impl From<financial_operation::Model> for Operation {
    fn from(m: financial_operation::Model) -> Self {
        Operation {
            id: m.id,
            operation_type: m.operation_type,
            amount: m.amount,
            occurred_at: m.occurred_at.with_timezone(&Utc),
            description: m.description,
        }
    }
}

/// Case-sensitive literal substring match on the description column. `LIKE`
/// would treat `%` and `_` as wildcards and ignores case on SQLite.
fn description_contains(backend: DbBackend, needle: &str) -> SimpleExpr {
    let position = match backend {
        DbBackend::Postgres => "strpos",
        _ => "instr",
    };
    Expr::expr(
        Func::cust(Alias::new(position))
            .arg(Expr::col((Entity, Column::Description)))
            .arg(needle),
    )
    .gt(0)
}

async fn insert_row(txn: &DatabaseTransaction, new: &NewOperation) -> Result<Operation, ServiceError> {
    let row = financial_operation::create(
        txn,
        &new.operation_type,
        new.amount,
        new.occurred_at,
        new.description.as_deref(),
    )
    .await?;
    Ok(row.into())
}

#[async_trait::async_trait]
impl OperationRepository for SeaOrmOperationRepository {
    async fn insert(&self, new: NewOperation) -> Result<Operation, ServiceError> {
        let txn = self.begin().await?;
        let op = insert_row(&txn, &new).await?;
        audit::record(&txn, op.id, ChangeKind::Created).await?;
        commit(txn).await?;
        Ok(op)
    }

    async fn insert_batch(&self, new: Vec<NewOperation>) -> Result<Vec<Operation>, ServiceError> {
        let txn = self.begin().await?;
        let mut created = Vec::with_capacity(new.len());
        for n in &new {
            created.push(insert_row(&txn, n).await?);
        }
        let ids: Vec<i32> = created.iter().map(|o| o.id).collect();
        audit::record_many(&txn, &ids, ChangeKind::Created).await?;
        commit(txn).await?;
        Ok(created)
    }

    async fn find(&self, id: i32) -> Result<Option<Operation>, ServiceError> {
        let row = Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(row.map(Operation::from))
    }

    async fn list(&self, filter: &OperationFilter, pagination: Pagination) -> Result<Vec<Operation>, ServiceError> {
        let (page_idx, per_page) = pagination.normalize();
        let mut query = Entity::find();
        if let Some(t) = filter.operation_type() {
            query = query.filter(Column::OperationType.eq(t));
        }
        if let Some(a) = filter.amount {
            query = query.filter(Column::Amount.eq(a));
        }
        if let Some(d) = filter.description() {
            query = query.filter(description_contains(self.db.get_database_backend(), d));
        }
        if let Some(at) = filter.occurred_at {
            query = query.filter(Column::OccurredAt.eq(at.fixed_offset()));
        }
        let rows = query
            .order_by_asc(Column::Id)
            .paginate(&self.db, per_page)
            .fetch_page(page_idx)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(rows.into_iter().map(Operation::from).collect())
    }

    async fn update(&self, id: i32, changes: &OperationChanges) -> Result<Option<Operation>, ServiceError> {
        let txn = self.begin().await?;
        let Some(row) = Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
        else {
            return Ok(None);
        };
        let mut am: financial_operation::ActiveModel = row.into();
        if let Some(t) = &changes.operation_type {
            financial_operation::validate_operation_type(t)?;
            am.operation_type = Set(t.clone());
        }
        if let Some(a) = changes.amount {
            financial_operation::validate_amount(a)?;
            am.amount = Set(a);
        }
        if let Some(d) = &changes.description {
            financial_operation::validate_description(d)?;
            am.description = Set(Some(d.clone()));
        }
        let updated = am.update(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        audit::record(&txn, id, ChangeKind::Updated).await?;
        commit(txn).await?;
        Ok(Some(updated.into()))
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let txn = self.begin().await?;
        let res = Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if res.rows_affected == 0 {
            return Ok(false);
        }
        audit::record(&txn, id, ChangeKind::Deleted).await?;
        commit(txn).await?;
        Ok(true)
    }

    async fn history(&self, id: i32) -> Result<Vec<AuditEntry>, ServiceError> {
        audit::entries_for(&self.db, id).await
    }
}
