//! PG Nexus - Paying-guest hostel management API
//!
//! Owners list properties and rooms, place tenants, record monthly rent and
//! publish notices; tenants file complaints and follow their own stay.
//! Room occupancy and property room counters are derived from the tenant
//! records and kept in line after every write.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **services**: Application use cases, authorization and occupancy
//! - **infra**: Persistence (SeaORM and in-memory), cache, mail, storage
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (filters, responses)
//! - **utils**: Utility functions and helpers
//! - **errors**: Centralized error handling
//!
//! The entities and their rules live in the `domain` crate.
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Start without a database
//! cargo run -- serve --in-memory
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Rebuild occupancy counters
//! cargo run -- reconcile
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
