//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token validation (and generation for tests and tooling).

pub mod jwt;
