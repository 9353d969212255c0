//! Password hashing and signed auth tokens.

pub mod password;
pub mod tokens;

pub use password::{hash_password, verify_password};
pub use tokens::{Claims, TokenError, TokenIssuer};
