//! Well-known role name constants.
//!
//! These must match the `role` claim the auth provider places in access tokens.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
