//! debrepro-lib: Core types and logic for debrepro
//!
//! This crate checks whether a published Debian binary package can be rebuilt
//! bit-for-bit from its source:
//! - `report`: parses a published build report into build metadata
//! - `snapshot`: picks archive snapshots that bound the original build time
//! - `recipe`: assembles the container recipe that recreates the build
//! - `execute`: builds the recipe in a container and hashes the artifact
//! - `outcome`: classifies each build and aggregates the final report
//! - `verify`: drives the whole pipeline for a list of packages

pub mod config;
pub mod consts;
pub mod depends;
pub mod execute;
pub mod fetch;
pub mod outcome;
pub mod packages;
pub mod paths;
pub mod recipe;
pub mod report;
pub mod snapshot;
pub mod util;
pub mod verify;
