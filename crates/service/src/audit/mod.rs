//! Audit log: one immutable entry per successful mutation of an operation.
//!
//! Entries reference operations by id only and are never removed, so the
//! trail of a deleted operation stays readable.

pub mod domain;
pub mod log;

pub use domain::{AuditEntry, ChangeKind};
pub use log::{entries_for, record, record_many, MemoryAuditLog};
