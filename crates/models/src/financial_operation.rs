use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

pub const OPERATION_TYPE_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 200;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "financial_operation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub operation_type: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub occurred_at: DateTimeWithTimeZone,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_operation_type(t: &str) -> Result<(), errors::ModelError> {
    if t.trim().is_empty() {
        return Err(errors::ModelError::Validation("operation_type required".into()));
    }
    if t.chars().count() > OPERATION_TYPE_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("operation_type longer than {OPERATION_TYPE_MAX_LEN} characters")));
    }
    Ok(())
}

pub fn validate_amount(amount: f64) -> Result<(), errors::ModelError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(errors::ModelError::Validation("amount must be > 0".into()));
    }
    Ok(())
}

pub fn validate_description(d: &str) -> Result<(), errors::ModelError> {
    if d.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("description longer than {DESCRIPTION_MAX_LEN} characters")));
    }
    Ok(())
}

/// Build an insertable row; the id is left to the database sequence.
pub fn new_active_model(
    operation_type: &str,
    amount: f64,
    occurred_at: DateTime<Utc>,
    description: Option<&str>,
) -> Result<ActiveModel, errors::ModelError> {
    validate_operation_type(operation_type)?;
    validate_amount(amount)?;
    if let Some(d) = description {
        validate_description(d)?;
    }
    Ok(ActiveModel {
        id: NotSet,
        operation_type: Set(operation_type.to_string()),
        amount: Set(amount),
        occurred_at: Set(occurred_at.into()),
        description: Set(description.map(str::to_string)),
    })
}

/// Insert one operation on any connection, including an open transaction.
pub async fn create<C: ConnectionTrait>(
    conn: &C,
    operation_type: &str,
    amount: f64,
    occurred_at: DateTime<Utc>,
    description: Option<&str>,
) -> Result<Model, errors::ModelError> {
    let am = new_active_model(operation_type, amount, occurred_at, description)?;
    am.insert(conn).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
