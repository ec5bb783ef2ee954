use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::domain::{BulkResult, DeleteConfirmation, NewOperation, Operation, OperationChanges, OperationFilter};
use super::repository::OperationRepository;
use crate::audit::AuditEntry;
use crate::errors::{ServiceError, NO_ITEMS};
use crate::pagination::Pagination;

const OPERATION: &str = "Operation";

/// Everything the HTTP layer may ask of the ledger. Callers hold it as
/// `Arc<dyn OperationStore>` so the backing repository can be swapped.
#[async_trait]
pub trait OperationStore: Send + Sync {
    async fn create(&self, candidate: &Value) -> Result<Operation, ServiceError>;
    async fn create_bulk(&self, candidates: Vec<Value>) -> Result<BulkResult, ServiceError>;
    async fn get_by_id(&self, id: i32) -> Result<Operation, ServiceError>;
    async fn list(&self, pagination: Pagination, filter: OperationFilter) -> Result<Vec<Operation>, ServiceError>;
    async fn update(&self, id: i32, patch: &Value) -> Result<Operation, ServiceError>;
    async fn delete(&self, id: i32) -> Result<DeleteConfirmation, ServiceError>;
    async fn history(&self, id: i32) -> Result<Vec<AuditEntry>, ServiceError>;
}

/// Operation business service independent of web framework
pub struct OperationService<R: OperationRepository> {
    repo: Arc<R>,
}

impl<R: OperationRepository> OperationService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }
}

#[async_trait]
impl<R: OperationRepository + 'static> OperationStore for OperationService<R> {
    /// Validate a candidate, store it and append a `created` audit entry.
    ///
    /// # Examples
    /// ```
    /// use service::operations::{OperationService, OperationStore};
    /// use service::operations::repository::memory::MemoryOperationRepository;
    /// use std::sync::Arc;
    /// let svc = OperationService::new(Arc::new(MemoryOperationRepository::default()));
    /// let candidate = serde_json::json!({"operation_type": "deposit", "amount": 100.0});
    /// let op = tokio_test::block_on(svc.create(&candidate)).unwrap();
    /// assert_eq!(op.operation_type, "deposit");
    /// assert!(tokio_test::block_on(svc.create(&serde_json::json!({"amount": 1}))).is_err());
    /// ```
    #[instrument(skip(self, candidate))]
    async fn create(&self, candidate: &Value) -> Result<Operation, ServiceError> {
        let new = NewOperation::from_candidate(candidate, Utc::now())?;
        let op = self.repo.insert(new).await?;
        info!(operation_id = op.id, operation_type = %op.operation_type, amount = op.amount, "operation_created");
        Ok(op)
    }

    #[instrument(skip(self, candidates), fields(count = candidates.len()))]
    async fn create_bulk(&self, candidates: Vec<Value>) -> Result<BulkResult, ServiceError> {
        if candidates.is_empty() {
            return Err(ServiceError::Validation(NO_ITEMS.to_string()));
        }
        let now = Utc::now();
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for candidate in candidates {
            match NewOperation::from_candidate(&candidate, now) {
                Ok(new) => accepted.push(new),
                Err(_) => rejected.push(candidate),
            }
        }
        let created = if accepted.is_empty() {
            debug!(rejected = rejected.len(), "bulk_nothing_to_store");
            Vec::new()
        } else {
            self.repo.insert_batch(accepted).await?
        };
        info!(created = created.len(), rejected = rejected.len(), "operations_bulk_created");
        Ok(BulkResult { created, rejected })
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> Result<Operation, ServiceError> {
        self.repo.find(id).await?.ok_or_else(|| ServiceError::not_found(OPERATION))
    }

    #[instrument(skip(self, filter))]
    async fn list(&self, pagination: Pagination, filter: OperationFilter) -> Result<Vec<Operation>, ServiceError> {
        self.repo.list(&filter, pagination).await
    }

    /// The patch must pass the create rules as a whole before any lookup.
    #[instrument(skip(self, patch))]
    async fn update(&self, id: i32, patch: &Value) -> Result<Operation, ServiceError> {
        let changes: OperationChanges = OperationChanges::from_patch(patch)?;
        let op = self
            .repo
            .update(id, &changes)
            .await?
            .ok_or_else(|| ServiceError::not_found(OPERATION))?;
        info!(operation_id = op.id, amount = op.amount, "operation_updated");
        Ok(op)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<DeleteConfirmation, ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found(OPERATION));
        }
        info!(operation_id = id, "operation_deleted");
        Ok(DeleteConfirmation::new(id))
    }

    #[instrument(skip(self))]
    async fn history(&self, id: i32) -> Result<Vec<AuditEntry>, ServiceError> {
        self.repo.history(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::ChangeKind;
    use crate::operations::repo::seaorm::SeaOrmOperationRepository;
    use crate::operations::repository::memory::MemoryOperationRepository;
    use crate::test_support::get_db;
    use serde_json::json;

    fn memory_service() -> (OperationService<MemoryOperationRepository>, Arc<MemoryOperationRepository>) {
        let repo = Arc::new(MemoryOperationRepository::default());
        (OperationService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn invalid_candidates_touch_nothing() -> Result<(), anyhow::Error> {
        let (svc, repo) = memory_service();
        for bad in [
            json!({"amount": 10}),
            json!({"operation_type": "", "amount": 10}),
            json!({"operation_type": "deposit", "amount": 0}),
            json!({"operation_type": "deposit", "amount": -5}),
            json!({"operation_type": "deposit", "amount": false}),
        ] {
            let err = svc.create(&bad).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{bad}");
        }
        assert_eq!(repo.operation_count(), 0);
        assert!(repo.audit_entries().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids_and_audits_once() -> Result<(), anyhow::Error> {
        let (svc, repo) = memory_service();
        let a = svc.create(&json!({"operation_type": "deposit", "amount": 1})).await?;
        svc.delete(a.id).await?;
        let b = svc.create(&json!({"operation_type": "deposit", "amount": 2})).await?;
        assert_ne!(a.id, b.id);
        let created: Vec<_> = repo
            .audit_entries()
            .into_iter()
            .filter(|e| e.change_kind == ChangeKind::Created)
            .map(|e| e.operation_id)
            .collect();
        assert_eq!(created, vec![a.id, b.id]);
        Ok(())
    }

    #[tokio::test]
    async fn bulk_empty_is_rejected_without_writes() -> Result<(), anyhow::Error> {
        let (svc, repo) = memory_service();
        match svc.create_bulk(vec![]).await {
            Err(ServiceError::Validation(msg)) => assert_eq!(msg, NO_ITEMS),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(repo.audit_entries().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn bulk_partitions_valid_and_invalid() -> Result<(), anyhow::Error> {
        let (svc, repo) = memory_service();
        let bad1 = json!({"operation_type": "deposit", "amount": -1});
        let bad2 = json!({"amount": 3, "note": "kept as sent"});
        let result = svc
            .create_bulk(vec![
                json!({"operation_type": "deposit", "amount": 10}),
                bad1.clone(),
                json!({"operation_type": "withdrawal", "amount": 5.5, "description": "atm"}),
                bad2.clone(),
            ])
            .await?;
        assert_eq!(result.created.len(), 2);
        assert_eq!(result.rejected, vec![bad1, bad2]);
        assert_eq!(repo.operation_count(), 2);
        assert_eq!(repo.audit_entries().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn bulk_with_only_invalid_items_stores_nothing() -> Result<(), anyhow::Error> {
        let (svc, repo) = memory_service();
        let result = svc.create_bulk(vec![json!({"amount": 1}), json!("nope")]).await?;
        assert!(result.created.is_empty());
        assert_eq!(result.rejected.len(), 2);
        assert_eq!(repo.operation_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn get_by_id_is_idempotent_and_reports_absence() -> Result<(), anyhow::Error> {
        let (svc, _) = memory_service();
        let op = svc.create(&json!({"operation_type": "deposit", "amount": 7})).await?;
        assert_eq!(svc.get_by_id(op.id).await?, op);
        assert_eq!(svc.get_by_id(op.id).await?, op);
        assert!(matches!(svc.get_by_id(999).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_patch_writes_nothing() -> Result<(), anyhow::Error> {
        let (svc, repo) = memory_service();
        let op = svc.create(&json!({"operation_type": "deposit", "amount": 7})).await?;
        let err = svc.update(op.id, &json!({"description": "only description"})).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(svc.get_by_id(op.id).await?, op);
        assert_eq!(repo.audit_entries().len(), 1);
        // validation runs before the lookup
        let err = svc.update(999, &json!({"amount": 1})).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = svc.update(999, &json!({"operation_type": "x", "amount": 1})).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn delete_absent_appends_no_audit() -> Result<(), anyhow::Error> {
        let (svc, repo) = memory_service();
        assert!(matches!(svc.delete(5).await, Err(ServiceError::NotFound(_))));
        assert!(repo.audit_entries().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn list_applies_filters_and_paging() -> Result<(), anyhow::Error> {
        let (svc, _) = memory_service();
        for i in 0..15 {
            let t = if i < 5 { "X" } else { "Y" };
            let d = if i == 3 { "xxabcxx" } else { "plain" };
            svc.create(&json!({"operation_type": t, "amount": i + 1, "description": d})).await?;
        }
        assert_eq!(svc.list(Pagination { page: 1, per_page: 10 }, OperationFilter::default()).await?.len(), 10);
        let second = svc.list(Pagination { page: 2, per_page: 10 }, OperationFilter::default()).await?;
        let amounts: Vec<f64> = second.iter().map(|o| o.amount).collect();
        assert_eq!(amounts, vec![11.0, 12.0, 13.0, 14.0, 15.0]);
        let xs = svc
            .list(Pagination { page: 1, per_page: 100 }, OperationFilter { operation_type: Some("X".into()), ..Default::default() })
            .await?;
        assert_eq!(xs.len(), 5);
        let abc = svc
            .list(Pagination::default(), OperationFilter { description: Some("abc".into()), ..Default::default() })
            .await?;
        assert_eq!(abc.len(), 1);
        assert_eq!(abc[0].description.as_deref(), Some("xxabcxx"));
        assert!(svc.list(Pagination { page: 9, per_page: 10 }, OperationFilter::default()).await?.is_empty());
        Ok(())
    }

    async fn deposit_lifecycle<R: OperationRepository + 'static>(svc: &OperationService<R>) -> Result<(), anyhow::Error> {
        let op = svc
            .create(&json!({"operation_type": "deposit", "amount": 100.0, "description": "initial"}))
            .await?;
        let updated = svc
            .update(op.id, &json!({"operation_type": "deposit", "amount": 150.0, "description": ""}))
            .await?;
        assert_eq!(updated.amount, 150.0);
        assert_eq!(updated.description.as_deref(), Some("initial"));
        assert_eq!(updated.occurred_at, op.occurred_at);

        let confirmation = svc.delete(op.id).await?;
        assert_eq!(confirmation.id, op.id);
        assert_eq!(confirmation.success, format!("Operation {} deleted", op.id));
        assert!(matches!(svc.get_by_id(op.id).await, Err(ServiceError::NotFound(_))));

        let kinds: Vec<_> = svc.history(op.id).await?.into_iter().map(|e| e.change_kind).collect();
        assert_eq!(kinds, vec![ChangeKind::Created, ChangeKind::Updated, ChangeKind::Deleted]);
        assert!(svc.history(op.id + 1000).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn deposit_lifecycle_in_memory() -> Result<(), anyhow::Error> {
        let (svc, _) = memory_service();
        deposit_lifecycle(&svc).await
    }

    #[tokio::test]
    async fn deposit_lifecycle_on_sqlite() -> Result<(), anyhow::Error> {
        let repo = Arc::new(SeaOrmOperationRepository::new(get_db().await?));
        deposit_lifecycle(&OperationService::new(repo)).await
    }
}
