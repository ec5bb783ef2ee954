pub mod errors;
pub mod db;
pub mod financial_operation;
pub mod audit_entry;

#[cfg(test)]
mod tests;
