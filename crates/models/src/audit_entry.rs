use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

pub const CREATED: &str = "created";
pub const UPDATED: &str = "updated";
pub const DELETED: &str = "deleted";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub operation_id: i32,
    pub timestamp: DateTimeWithTimeZone,
    pub change_kind: String,
}

// No relation to financial_operation: entries outlive the rows they describe.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn validate_change_kind(kind: &str) -> Result<(), errors::ModelError> {
    if ![CREATED, UPDATED, DELETED].contains(&kind) {
        return Err(errors::ModelError::Validation(format!("unknown change kind: {kind}")));
    }
    Ok(())
}

fn new_active_model(operation_id: i32, change_kind: &str) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        operation_id: Set(operation_id),
        timestamp: Set(Utc::now().into()),
        change_kind: Set(change_kind.to_string()),
    }
}

/// Append one entry. Pass the transaction that carries the primary write.
pub async fn record<C: ConnectionTrait>(conn: &C, operation_id: i32, change_kind: &str) -> Result<Model, errors::ModelError> {
    validate_change_kind(change_kind)?;
    new_active_model(operation_id, change_kind)
        .insert(conn)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Append one entry per id in a single statement; returns the row count.
pub async fn record_many<C: ConnectionTrait>(conn: &C, operation_ids: &[i32], change_kind: &str) -> Result<u64, errors::ModelError> {
    validate_change_kind(change_kind)?;
    if operation_ids.is_empty() {
        return Ok(0);
    }
    let rows = operation_ids.iter().map(|id| new_active_model(*id, change_kind));
    Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All entries for one operation in insertion order.
pub async fn for_operation<C: ConnectionTrait>(conn: &C, operation_id: i32) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::OperationId.eq(operation_id))
        .order_by_asc(Column::Id)
        .all(conn)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
