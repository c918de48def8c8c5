//! Debian snapshot archive handling.
//!
//! The snapshot archive publishes a frozen copy of the Debian archive several
//! times a day. Pinning the build container to the snapshots taken just before
//! the original build recreates the package set that build saw.
//!
//! - [`listing`] scrapes the monthly listing page into [`SnapshotRef`]s
//! - [`select`] picks the snapshots that bound a build time

pub mod listing;
pub mod select;
mod types;

pub use listing::{listing_url, parse_listing};
pub use select::select_snapshots;
pub use types::*;
