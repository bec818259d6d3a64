//! Authentication primitives.
//!
//! Tokens are issued by the external auth provider; this service only
//! validates them ([`jwt`]).

pub mod jwt;
