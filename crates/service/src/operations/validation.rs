//! Candidate checks and conversion from raw JSON into typed inputs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use models::financial_operation::{DESCRIPTION_MAX_LEN, OPERATION_TYPE_MAX_LEN};
use serde_json::Value;
use tracing::debug;

use super::domain::{NewOperation, OperationChanges};
use crate::errors::ServiceError;

/// Core admission rule: a non-blank `operation_type` string and a numeric
/// `amount` strictly above zero. Says nothing about which rule failed.
pub fn validate(candidate: &Value) -> bool {
    let has_type = candidate
        .get("operation_type")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.trim().is_empty());
    has_type && amount_of(candidate).is_some_and(|a| a > 0.0)
}

// Value::as_f64 is None for booleans and strings.
fn amount_of(candidate: &Value) -> Option<f64> {
    candidate.get("amount").and_then(Value::as_f64).filter(|a| a.is_finite())
}

/// Accepts RFC 3339, naive date-time (`T` or space separated, read as UTC)
/// and bare dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn optional_str<'a>(candidate: &'a Value, key: &str) -> Result<Option<&'a str>, ServiceError> {
    match candidate.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ServiceError::invalid_data()),
    }
}

fn within(s: &str, max: usize) -> bool {
    s.chars().count() <= max
}

impl NewOperation {
    /// Validate and convert a create candidate. `now` fills a missing
    /// `occurred_at`.
    pub fn from_candidate(candidate: &Value, now: DateTime<Utc>) -> Result<Self, ServiceError> {
        if !validate(candidate) {
            debug!("candidate_rejected");
            return Err(ServiceError::invalid_data());
        }
        let operation_type = candidate
            .get("operation_type")
            .and_then(Value::as_str)
            .ok_or_else(ServiceError::invalid_data)?;
        let amount = amount_of(candidate).ok_or_else(ServiceError::invalid_data)?;
        let description = optional_str(candidate, "description")?;
        let occurred_at = match optional_str(candidate, "occurred_at")? {
            None => now,
            Some(raw) => parse_timestamp(raw).ok_or_else(ServiceError::invalid_data)?,
        };
        if !within(operation_type, OPERATION_TYPE_MAX_LEN)
            || !description.map_or(true, |d| within(d, DESCRIPTION_MAX_LEN))
        {
            debug!("candidate_rejected_length");
            return Err(ServiceError::invalid_data());
        }
        Ok(NewOperation {
            operation_type: operation_type.to_string(),
            amount,
            occurred_at,
            description: description.map(str::to_string),
        })
    }
}

impl OperationChanges {
    /// Validate a whole patch with the create rules, then keep only the
    /// fields it overwrites. `occurred_at` is never patched.
    pub fn from_patch(patch: &Value) -> Result<Self, ServiceError> {
        if !validate(patch) {
            debug!("patch_rejected");
            return Err(ServiceError::invalid_data());
        }
        let operation_type = optional_str(patch, "operation_type")?.filter(|t| !t.is_empty());
        let description = optional_str(patch, "description")?.filter(|d| !d.is_empty());
        if !operation_type.map_or(true, |t| within(t, OPERATION_TYPE_MAX_LEN))
            || !description.map_or(true, |d| within(d, DESCRIPTION_MAX_LEN))
        {
            debug!("patch_rejected_length");
            return Err(ServiceError::invalid_data());
        }
        Ok(OperationChanges {
            operation_type: operation_type.map(str::to_string),
            amount: amount_of(patch),
            description: description.map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn accepts_minimal_candidate() {
        assert!(validate(&json!({"operation_type": "deposit", "amount": 1})));
        assert!(validate(&json!({"operation_type": "deposit", "amount": 0.01, "extra": true})));
    }

    #[test]
    fn rejects_missing_or_blank_type() {
        assert!(!validate(&json!({"amount": 10})));
        assert!(!validate(&json!({"operation_type": "   ", "amount": 10})));
        assert!(!validate(&json!({"operation_type": 7, "amount": 10})));
    }

    #[test]
    fn rejects_non_positive_or_non_numeric_amount() {
        assert!(!validate(&json!({"operation_type": "x", "amount": 0})));
        assert!(!validate(&json!({"operation_type": "x", "amount": -3.5})));
        assert!(!validate(&json!({"operation_type": "x", "amount": "100"})));
        assert!(!validate(&json!({"operation_type": "x", "amount": true})));
        assert!(!validate(&json!({"operation_type": "x"})));
        assert!(!validate(&json!([1, 2])));
    }

    #[test]
    fn parses_supported_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01"), Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(parse_timestamp("01/01/2024"), None);
    }

    #[test]
    fn candidate_defaults_occurred_at_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let op = NewOperation::from_candidate(&json!({"operation_type": "deposit", "amount": 5}), now).unwrap();
        assert_eq!(op.occurred_at, now);
        assert_eq!(op.amount, 5.0);
        assert_eq!(op.description, None);
    }

    #[test]
    fn candidate_conversion_rejects_bad_optional_fields() {
        let now = Utc::now();
        let long = "x".repeat(DESCRIPTION_MAX_LEN + 1);
        for bad in [
            json!({"operation_type": "d", "amount": 1, "description": long}),
            json!({"operation_type": "d", "amount": 1, "description": 5}),
            json!({"operation_type": "d", "amount": 1, "occurred_at": "not a date"}),
            json!({"operation_type": "t".repeat(OPERATION_TYPE_MAX_LEN + 1), "amount": 1}),
        ] {
            assert!(NewOperation::from_candidate(&bad, now).is_err(), "{bad}");
        }
    }

    #[test]
    fn patch_keeps_only_supplied_values() {
        let changes = OperationChanges::from_patch(&json!({
            "operation_type": "deposit", "amount": 150.0, "description": ""
        }))
        .unwrap();
        assert_eq!(changes.operation_type.as_deref(), Some("deposit"));
        assert_eq!(changes.amount, Some(150.0));
        assert_eq!(changes.description, None);
    }

    #[test]
    fn patch_is_validated_as_a_whole() {
        assert!(OperationChanges::from_patch(&json!({"description": "only this"})).is_err());
        assert!(OperationChanges::from_patch(&json!({"operation_type": "x", "amount": -1})).is_err());
    }
}
