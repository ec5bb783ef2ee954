//! Bearer-token issuing and verification, independent of the web framework.

pub mod errors;
pub mod token;

pub use errors::AuthError;
pub use token::{bearer_token, Claims, TokenConfig, TokenService};
