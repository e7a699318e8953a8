//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{Collaborators, ServiceContainer, Services};

/// Application state shared by every handler.
///
/// The database and cache are optional: the in-memory backend runs without
/// a database, and rate limiting is skipped when no Redis is configured.
#[derive(Clone)]
pub struct AppState {
    /// Service container
    pub services: Arc<dyn ServiceContainer>,
    pub config: Arc<Config>,
    /// Redis cache
    pub cache: Option<Arc<Cache>>,
    /// Database connection
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state backed by the SQL database.
    pub fn from_config(
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
        config: Config,
        collaborators: Collaborators,
    ) -> Self {
        let services = Services::from_connection(
            database.get_connection(),
            config.clone(),
            collaborators,
        );

        Self {
            services: Arc::new(services),
            config: Arc::new(config),
            cache,
            database: Some(database),
        }
    }

    /// Application state over a fresh in-memory store.
    pub fn in_memory(config: Config, cache: Option<Arc<Cache>>, collaborators: Collaborators) -> Self {
        let services = Services::in_memory(config.clone(), collaborators);

        Self {
            services: Arc::new(services),
            config: Arc::new(config),
            cache,
            database: None,
        }
    }

    /// Create application state with a manually injected container.
    pub fn new(services: Arc<dyn ServiceContainer>, config: Config) -> Self {
        Self {
            services,
            config: Arc::new(config),
            cache: None,
            database: None,
        }
    }
}
