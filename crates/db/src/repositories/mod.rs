//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod stats_repo;
pub mod track_repo;

pub use stats_repo::StatsRepo;
pub use track_repo::TrackRepo;
