//! Shared utilities.
//!
//! Common utilities used across the crate including hashing, HTML queries and
//! test helpers.

pub mod hash;
pub mod html;

#[cfg(test)]
pub mod testutil;
