use chrono::Utc;
use sea_orm::ConnectionTrait;

use super::domain::{AuditEntry, ChangeKind};
use crate::errors::ServiceError;

/// Append one entry through SeaORM. `conn` is the transaction that carries
/// the primary write, so both commit or roll back together.
pub async fn record<C: ConnectionTrait>(conn: &C, operation_id: i32, kind: ChangeKind) -> Result<AuditEntry, ServiceError> {
    let row = models::audit_entry::record(conn, operation_id, kind.as_str()).await?;
    row.try_into()
}

/// Batch form of [`record`] used by bulk create.
pub async fn record_many<C: ConnectionTrait>(conn: &C, operation_ids: &[i32], kind: ChangeKind) -> Result<u64, ServiceError> {
    Ok(models::audit_entry::record_many(conn, operation_ids, kind.as_str()).await?)
}

/// Entries for one operation, oldest first.
pub async fn entries_for<C: ConnectionTrait>(conn: &C, operation_id: i32) -> Result<Vec<AuditEntry>, ServiceError> {
    models::audit_entry::for_operation(conn, operation_id)
        .await?
        .into_iter()
        .map(AuditEntry::try_from)
        .collect()
}

/// In-process audit log. Owned by the in-memory repository and mutated under
/// the same lock as the operations it describes.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    next_id: i32,
    entries: Vec<AuditEntry>,
}

impl MemoryAuditLog {
    pub fn record(&mut self, operation_id: i32, kind: ChangeKind) -> AuditEntry {
        self.next_id += 1;
        let entry = AuditEntry { id: self.next_id, operation_id, timestamp: Utc::now(), change_kind: kind };
        self.entries.push(entry.clone());
        entry
    }

    pub fn record_many(&mut self, operation_ids: &[i32], kind: ChangeKind) -> u64 {
        for id in operation_ids {
            self.record(*id, kind);
        }
        operation_ids.len() as u64
    }

    pub fn entries_for(&self, operation_id: i32) -> Vec<AuditEntry> {
        self.entries.iter().filter(|e| e.operation_id == operation_id).cloned().collect()
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }
}
