use async_trait::async_trait;

use super::domain::{NewOperation, Operation, OperationChanges, OperationFilter};
use crate::audit::AuditEntry;
use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Persistence for operations and their audit trail. Every mutating call is
/// one unit of work: the row change and its audit append land together or
/// not at all.
#[async_trait]
pub trait OperationRepository: Send + Sync {
    async fn insert(&self, new: NewOperation) -> Result<Operation, ServiceError>;
    /// Insert all rows and one `created` entry per row atomically.
    async fn insert_batch(&self, new: Vec<NewOperation>) -> Result<Vec<Operation>, ServiceError>;
    async fn find(&self, id: i32) -> Result<Option<Operation>, ServiceError>;
    async fn list(&self, filter: &OperationFilter, pagination: Pagination) -> Result<Vec<Operation>, ServiceError>;
    /// `None` when no row has this id.
    async fn update(&self, id: i32, changes: &OperationChanges) -> Result<Option<Operation>, ServiceError>;
    /// `false` when no row has this id.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
    async fn history(&self, id: i32) -> Result<Vec<AuditEntry>, ServiceError>;
}

/// In-memory repository for tests and doc examples
pub mod memory {
    use super::*;
    use crate::audit::{ChangeKind, MemoryAuditLog};
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Debug, Default)]
    struct State {
        next_id: i32,
        operations: BTreeMap<i32, Operation>,
        audit: MemoryAuditLog,
    }

    impl State {
        fn store(&mut self, new: NewOperation) -> Operation {
            self.next_id += 1;
            let op = Operation {
                id: self.next_id,
                operation_type: new.operation_type,
                amount: new.amount,
                occurred_at: new.occurred_at,
                description: new.description,
            };
            self.operations.insert(op.id, op.clone());
            op
        }
    }

    /// Operations and audit log behind a single lock, so each mutation and
    /// its audit append are observed together.
    #[derive(Debug, Default)]
    pub struct MemoryOperationRepository {
        state: Mutex<State>,
    }

    impl MemoryOperationRepository {
        fn lock(&self) -> Result<MutexGuard<'_, State>, ServiceError> {
            self.state.lock().map_err(|e| ServiceError::Db(e.to_string()))
        }

        /// Number of stored operations.
        pub fn operation_count(&self) -> usize {
            self.state.lock().map(|s| s.operations.len()).unwrap_or_default()
        }

        /// Full audit log across all operations, in append order.
        pub fn audit_entries(&self) -> Vec<AuditEntry> {
            self.state.lock().map(|s| s.audit.entries().to_vec()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl OperationRepository for MemoryOperationRepository {
        async fn insert(&self, new: NewOperation) -> Result<Operation, ServiceError> {
            let mut state = self.lock()?;
            let op = state.store(new);
            state.audit.record(op.id, ChangeKind::Created);
            Ok(op)
        }

        async fn insert_batch(&self, new: Vec<NewOperation>) -> Result<Vec<Operation>, ServiceError> {
            let mut state = self.lock()?;
            let created: Vec<Operation> = new.into_iter().map(|n| state.store(n)).collect();
            let ids: Vec<i32> = created.iter().map(|o| o.id).collect();
            state.audit.record_many(&ids, ChangeKind::Created);
            Ok(created)
        }

        async fn find(&self, id: i32) -> Result<Option<Operation>, ServiceError> {
            Ok(self.lock()?.operations.get(&id).cloned())
        }

        async fn list(&self, filter: &OperationFilter, pagination: Pagination) -> Result<Vec<Operation>, ServiceError> {
            let (_, per_page) = pagination.normalize();
            let state = self.lock()?;
            Ok(state
                .operations
                .values()
                .filter(|op| filter.matches(op))
                .skip(pagination.offset() as usize)
                .take(per_page as usize)
                .cloned()
                .collect())
        }

        async fn update(&self, id: i32, changes: &OperationChanges) -> Result<Option<Operation>, ServiceError> {
            let mut state = self.lock()?;
            let Some(op) = state.operations.get_mut(&id) else {
                return Ok(None);
            };
            changes.apply_to(op);
            let updated = op.clone();
            state.audit.record(id, ChangeKind::Updated);
            Ok(Some(updated))
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            let mut state = self.lock()?;
            if state.operations.remove(&id).is_none() {
                return Ok(false);
            }
            state.audit.record(id, ChangeKind::Deleted);
            Ok(true)
        }

        async fn history(&self, id: i32) -> Result<Vec<AuditEntry>, ServiceError> {
            Ok(self.lock()?.audit.entries_for(id))
        }
    }
}
