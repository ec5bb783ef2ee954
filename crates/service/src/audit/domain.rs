use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// What happened to the referenced operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => models::audit_entry::CREATED,
            ChangeKind::Updated => models::audit_entry::UPDATED,
            ChangeKind::Deleted => models::audit_entry::DELETED,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            models::audit_entry::CREATED => Ok(ChangeKind::Created),
            models::audit_entry::UPDATED => Ok(ChangeKind::Updated),
            models::audit_entry::DELETED => Ok(ChangeKind::Deleted),
            other => Err(ServiceError::Db(format!("unknown change kind in audit log: {other}"))),
        }
    }
}

/// Exportable audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i32,
    pub operation_id: i32,
    pub timestamp: DateTime<Utc>,
    pub change_kind: ChangeKind,
}

impl TryFrom<models::audit_entry::Model> for AuditEntry {
    type Error = ServiceError;

    fn try_from(m: models::audit_entry::Model) -> Result<Self, Self::Error> {
        Ok(AuditEntry {
            id: m.id,
            operation_id: m.operation_id,
            timestamp: m.timestamp.with_timezone(&Utc),
            change_kind: m.change_kind.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_kind_round_trips_through_storage_strings() {
        for kind in [ChangeKind::Created, ChangeKind::Updated, ChangeKind::Deleted] {
            assert_eq!(kind.as_str().parse::<ChangeKind>().unwrap(), kind);
        }
        assert!("archived".parse::<ChangeKind>().is_err());
    }

    #[test]
    fn change_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChangeKind::Deleted).unwrap(), "\"deleted\"");
    }
}
