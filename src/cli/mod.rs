//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `reconcile` - Rebuild occupancy counters
//! - `seed-admin` - Bootstrap the admin account

pub mod args;

pub use args::{Cli, Commands};
