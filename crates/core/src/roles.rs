//! Well-known role name constants.
//!
//! Roles are issued by the external auth service; only `admin` grants write
//! access to the catalog.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
