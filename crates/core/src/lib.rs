//! Domain layer for the track catalog.
//!
//! Zero I/O: everything here is pure and usable by the repository layer, the
//! HTTP layer, and any future tooling alike.

pub mod error;
pub mod filters;
pub mod retrieval;
pub mod roles;
pub mod search;
pub mod stats;
pub mod track;
pub mod types;
