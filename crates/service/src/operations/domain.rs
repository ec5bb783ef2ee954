use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::validation::parse_timestamp;

/// Exportable financial operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: i32,
    pub operation_type: String,
    pub amount: f64,
    pub occurred_at: DateTime<Utc>,
    pub description: Option<String>,
}

/// Validated input for a new row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOperation {
    pub operation_type: String,
    pub amount: f64,
    pub occurred_at: DateTime<Utc>,
    pub description: Option<String>,
}

/// Fields a patch actually overwrites; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationChanges {
    pub operation_type: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
}

impl OperationChanges {
    /// Apply onto an in-memory record.
    pub fn apply_to(&self, op: &mut Operation) {
        if let Some(t) = &self.operation_type {
            op.operation_type = t.clone();
        }
        if let Some(a) = self.amount {
            op.amount = a;
        }
        if let Some(d) = &self.description {
            op.description = Some(d.clone());
        }
    }
}

/// Conjunctive list filter. Empty strings and nulls are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OperationFilter {
    pub operation_type: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl OperationFilter {
    /// Exact-match type, if one was given.
    pub fn operation_type(&self) -> Option<&str> {
        self.operation_type.as_deref().filter(|t| !t.is_empty())
    }

    /// Substring to look for in descriptions, if one was given.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    pub fn matches(&self, op: &Operation) -> bool {
        if let Some(t) = self.operation_type() {
            if op.operation_type != t {
                return false;
            }
        }
        if let Some(a) = self.amount {
            if op.amount != a {
                return false;
            }
        }
        if let Some(d) = self.description() {
            if !op.description.as_deref().is_some_and(|have| have.contains(d)) {
                return false;
            }
        }
        if let Some(at) = self.occurred_at {
            if op.occurred_at != at {
                return false;
            }
        }
        true
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
    }
}

/// Outcome of a bulk create: what was stored and what was turned away.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkResult {
    pub created: Vec<Operation>,
    pub rejected: Vec<Value>,
}

/// Body returned after a delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteConfirmation {
    pub success: String,
    pub id: i32,
}

impl DeleteConfirmation {
    pub fn new(id: i32) -> Self {
        Self { success: format!("Operation {id} deleted"), id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn op(t: &str, amount: f64, desc: Option<&str>) -> Operation {
        Operation {
            id: 1,
            operation_type: t.into(),
            amount,
            occurred_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            description: desc.map(str::to_string),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(OperationFilter::default().matches(&op("deposit", 1.0, None)));
    }

    #[test]
    fn filter_fields_are_conjunctive() {
        let f = OperationFilter { operation_type: Some("deposit".into()), amount: Some(5.0), ..Default::default() };
        assert!(f.matches(&op("deposit", 5.0, None)));
        assert!(!f.matches(&op("deposit", 6.0, None)));
        assert!(!f.matches(&op("withdrawal", 5.0, None)));
    }

    #[test]
    fn description_is_substring_and_requires_a_value() {
        let f = OperationFilter { description: Some("abc".into()), ..Default::default() };
        assert!(f.matches(&op("x", 1.0, Some("xxabcxx"))));
        assert!(!f.matches(&op("x", 1.0, Some("ab"))));
        assert!(!f.matches(&op("x", 1.0, None)));
    }

    #[test]
    fn empty_strings_are_ignored() {
        let f: OperationFilter = serde_json::from_str(r#"{"operation_type": "", "description": "", "amount": null, "occurred_at": ""}"#).unwrap();
        assert!(f.operation_type().is_none());
        assert!(f.description().is_none());
        assert!(f.occurred_at.is_none());
        assert!(f.matches(&op("anything", 3.0, None)));
    }

    #[test]
    fn occurred_at_accepts_date_only() {
        let f: OperationFilter = serde_json::from_str(r#"{"occurred_at": "2024-01-01"}"#).unwrap();
        assert!(f.matches(&op("x", 1.0, None)));
        assert!(serde_json::from_str::<OperationFilter>(r#"{"occurred_at": "yesterday"}"#).is_err());
    }

    #[test]
    fn changes_apply_only_supplied_fields() {
        let mut o = op("deposit", 1.0, Some("initial"));
        OperationChanges { amount: Some(2.0), ..Default::default() }.apply_to(&mut o);
        assert_eq!(o.amount, 2.0);
        assert_eq!(o.description.as_deref(), Some("initial"));
        assert_eq!(o.operation_type, "deposit");
    }

    #[test]
    fn delete_confirmation_names_the_id() {
        let c = DeleteConfirmation::new(42);
        assert_eq!(c.id, 42);
        assert!(c.success.contains("42"));
    }
}
