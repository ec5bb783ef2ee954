//! Shared building blocks for the ledger crates: log setup and wire types
//! that more than one crate needs.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok", token: None };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn health_omits_missing_token() {
        let h = types::Health { status: "ok", token: None };
        let json = serde_json::to_value(&h).unwrap();
        assert!(json.get("token").is_none());
    }
}
