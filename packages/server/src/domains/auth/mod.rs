//! Auth domain - bearer token verification
//!
//! Tokens are issued by the NMWRAP identity service and carry the user's
//! id and e-mail address. This crate only verifies them; `create_token`
//! exists for tooling and tests.

pub mod jwt;

pub use jwt::{Claims, JwtService};
