//! Service Container - Centralized service access with parallel execution support.
//!
//! Wires every service over one unit of work, one keyed lock registry and
//! the injected collaborators (mailer, notifier, file storage).

use std::future::Future;
use std::sync::Arc;

use super::{
    Authenticator, AuthService, ComplaintManager, ComplaintService, DashboardManager,
    DashboardService, NoticeManager, NoticeService, OccupancyEngine, PaymentManager,
    PaymentService, PropertyManager, PropertyService, RoomManager, RoomService, TenantManager,
    TenantService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{
    FileStorage, KeyedLocks, LocalStorage, LogMailer, LogNotifier, Mailer, MemoryStore,
    Notifications, Notifier, Persistence, UnitOfWork,
};
use crate::utils::EmailTemplates;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    fn properties(&self) -> Arc<dyn PropertyService>;

    fn rooms(&self) -> Arc<dyn RoomService>;

    fn tenants(&self) -> Arc<dyn TenantService>;

    fn payments(&self) -> Arc<dyn PaymentService>;

    fn complaints(&self) -> Arc<dyn ComplaintService>;

    fn notices(&self) -> Arc<dyn NoticeService>;

    fn dashboard(&self) -> Arc<dyn DashboardService>;
}

/// Outbound adapters the services talk to.
#[derive(Clone)]
pub struct Collaborators {
    pub mailer: Arc<dyn Mailer>,
    pub notifier: Arc<dyn Notifier>,
    pub storage: Arc<dyn FileStorage>,
}

impl Collaborators {
    /// Logging mailer and notifier plus local disk storage.
    pub fn from_config(config: &Config) -> Self {
        Self {
            mailer: Arc::new(LogMailer::new(config.email_from.clone())),
            notifier: Arc::new(LogNotifier),
            storage: Arc::new(LocalStorage::new(
                config.upload_dir.clone(),
                config.public_base_url.clone(),
            )),
        }
    }
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    property_service: Arc<dyn PropertyService>,
    room_service: Arc<dyn RoomService>,
    tenant_service: Arc<dyn TenantService>,
    payment_service: Arc<dyn PaymentService>,
    complaint_service: Arc<dyn ComplaintService>,
    notice_service: Arc<dyn NoticeService>,
    dashboard_service: Arc<dyn DashboardService>,
}

impl Services {
    /// Build every service over `uow`.
    pub fn build<U: UnitOfWork + 'static>(uow: Arc<U>, config: Config, collaborators: Collaborators) -> Self {
        let locks = Arc::new(KeyedLocks::new());
        let engine = Arc::new(OccupancyEngine::new(uow.clone(), locks.clone()));
        let notifications = Notifications::new(collaborators.notifier);
        let templates = EmailTemplates::new(config.frontend_url.clone());
        let max_upload_bytes = config.max_upload_bytes;

        Self {
            auth_service: Arc::new(Authenticator::new(
                uow.clone(),
                config,
                collaborators.mailer.clone(),
            )),
            user_service: Arc::new(UserManager::new(uow.clone())),
            property_service: Arc::new(PropertyManager::new(
                uow.clone(),
                locks,
                collaborators.storage,
                max_upload_bytes,
            )),
            room_service: Arc::new(RoomManager::new(uow.clone(), engine.clone())),
            tenant_service: Arc::new(TenantManager::new(
                uow.clone(),
                engine,
                notifications.clone(),
            )),
            payment_service: Arc::new(PaymentManager::new(uow.clone(), notifications.clone())),
            complaint_service: Arc::new(ComplaintManager::new(
                uow.clone(),
                notifications.clone(),
                collaborators.mailer,
                templates,
            )),
            notice_service: Arc::new(NoticeManager::new(uow.clone(), notifications)),
            dashboard_service: Arc::new(DashboardManager::new(uow)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        collaborators: Collaborators,
    ) -> Self {
        Self::build(Arc::new(Persistence::new(db)), config, collaborators)
    }

    /// Services over a fresh in-memory store.
    pub fn in_memory(config: Config, collaborators: Collaborators) -> Self {
        Self::build(Arc::new(MemoryStore::new()), config, collaborators)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn properties(&self) -> Arc<dyn PropertyService> {
        self.property_service.clone()
    }

    fn rooms(&self) -> Arc<dyn RoomService> {
        self.room_service.clone()
    }

    fn tenants(&self) -> Arc<dyn TenantService> {
        self.tenant_service.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentService> {
        self.payment_service.clone()
    }

    fn complaints(&self) -> Arc<dyn ComplaintService> {
        self.complaint_service.clone()
    }

    fn notices(&self) -> Arc<dyn NoticeService> {
        self.notice_service.clone()
    }

    fn dashboard(&self) -> Arc<dyn DashboardService> {
        self.dashboard_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute three independent async operations in parallel.
    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }

    /// Execute four independent async operations in parallel.
    pub async fn join4<F1, F2, F3, F4, T1, T2, T3, T4>(
        f1: F1,
        f2: F2,
        f3: F3,
        f4: F4,
    ) -> AppResult<(T1, T2, T3, T4)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
        F4: Future<Output = AppResult<T4>>,
    {
        try_join!(f1, f2, f3, f4)
    }

    /// Execute operations in parallel with a concurrency limit.
    ///
    /// Useful when you have many operations but want to limit
    /// concurrent database connections.
    ///
    /// # Example
    /// ```ignore
    /// let settled = parallel::join_all_limited(
    ///     rooms.iter().map(|room| engine.recompute_room(room.id)),
    ///     8, // Max 8 concurrent recomputes
    /// ).await?;
    /// ```
    pub async fn join_all_limited<F, T, I>(futures: I, limit: usize) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
        I: IntoIterator<Item = F>,
    {
        use futures::stream::{self, StreamExt, TryStreamExt};

        let futures: Vec<AppResult<F>> = futures.into_iter().map(Ok).collect();
        stream::iter(futures)
            .try_buffer_unordered(limit.max(1))
            .try_collect()
            .await
    }
}
