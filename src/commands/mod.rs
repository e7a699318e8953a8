//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module for separation of concerns.

pub mod migrate;
pub mod reconcile;
pub mod seed_admin;
pub mod serve;
