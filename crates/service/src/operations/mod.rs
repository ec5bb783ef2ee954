//! Financial operations: domain types, validation, repositories and the
//! `OperationStore` service.

pub mod domain;
pub mod validation;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{BulkResult, DeleteConfirmation, NewOperation, Operation, OperationChanges, OperationFilter};
pub use service::{OperationService, OperationStore};
