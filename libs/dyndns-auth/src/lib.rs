//! Password Hasher (C2) and Session Tokens (C3).

mod password;
mod token;

pub use password::{hash, verify, PasswordError};
pub use token::{Claims, TokenCodec, TokenError};
