//! Service layer for the operations ledger.
//! - `operations`: validation, partial updates, filtered listing, and the
//!   `OperationStore` every transport talks to.
//! - `audit`: the append-only change log written alongside each mutation.
//! - `auth`: bearer token issuing and verification.
//!
//! Persistence sits behind repository traits so the same service runs on
//! SeaORM or on the in-memory repository used by tests.

pub mod errors;
pub mod pagination;
pub mod audit;
pub mod auth;
pub mod operations;
#[cfg(test)]
pub mod test_support;
