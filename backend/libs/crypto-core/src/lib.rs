//! Shared cryptographic building blocks for the blog backend.
//!
//! - `jwt`: issuing and verifying the signed, time-limited identity tokens
//!   that authenticate mutating requests.
pub mod jwt;

pub use jwt::{bearer_token, Claims, JwtSettings, TokenError, TokenService};
