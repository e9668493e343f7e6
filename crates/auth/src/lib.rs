//! Session tokens for Tarefas+.
//!
//! Sessions are issued by an external identity provider as HS256 JWTs signed
//! with a shared secret. This crate validates them and turns their claims
//! into an [`entities::Identity`]. Token generation is provided for trusted
//! tooling and tests.

mod error;
mod jwt;

pub use error::*;
pub use jwt::*;

/// Default JWT expiration time in hours.
pub const DEFAULT_JWT_EXPIRATION_HOURS: u64 = 24;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "tarefas";
