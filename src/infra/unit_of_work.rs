//! Unit of Work pattern implementation.
//!
//! The Unit of Work:
//! - Centralizes access to all repositories
//! - Manages transactions (begin, commit, rollback)
//! - Ensures consistency across multiple repository operations
//!
//! Two backends implement it: `Persistence` over SeaORM and
//! `MemoryStore` for tests and `serve --in-memory`.

use async_trait::async_trait;
use sea_orm::{AccessMode, DatabaseConnection, IsolationLevel, TransactionTrait};
use std::future::Future;
use std::pin::Pin;

use super::repositories::{
    ComplaintRepository, DbHandle, NoticeRepository, PaymentRepository, PropertyRepository,
    RoomRepository, SeaStore, TenantRepository, UserRepository,
};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by a transaction body.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Access to every repository of one backend.
pub trait Repositories: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn properties(&self) -> &dyn PropertyRepository;
    fn rooms(&self) -> &dyn RoomRepository;
    fn tenants(&self) -> &dyn TenantRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn complaints(&self) -> &dyn ComplaintRepository;
    fn notices(&self) -> &dyn NoticeRepository;
}

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to the generic method.
/// For testing, mock the repositories behind a test unit of work or use
/// the in-memory backend.
#[async_trait]
pub trait UnitOfWork: Repositories {
    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success and rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same transaction.
#[derive(Clone, Copy)]
pub struct TransactionContext<'a> {
    repos: &'a dyn Repositories,
}

impl<'a> TransactionContext<'a> {
    pub fn new(repos: &'a dyn Repositories) -> Self {
        Self { repos }
    }

    pub fn users(&self) -> &'a dyn UserRepository {
        self.repos.users()
    }

    pub fn properties(&self) -> &'a dyn PropertyRepository {
        self.repos.properties()
    }

    pub fn rooms(&self) -> &'a dyn RoomRepository {
        self.repos.rooms()
    }

    pub fn tenants(&self) -> &'a dyn TenantRepository {
        self.repos.tenants()
    }

    pub fn payments(&self) -> &'a dyn PaymentRepository {
        self.repos.payments()
    }

    pub fn complaints(&self) -> &'a dyn ComplaintRepository {
        self.repos.complaints()
    }

    pub fn notices(&self) -> &'a dyn NoticeRepository {
        self.repos.notices()
    }
}

impl<H: DbHandle> Repositories for SeaStore<H> {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn properties(&self) -> &dyn PropertyRepository {
        self
    }

    fn rooms(&self) -> &dyn RoomRepository {
        self
    }

    fn tenants(&self) -> &dyn TenantRepository {
        self
    }

    fn payments(&self) -> &dyn PaymentRepository {
        self
    }

    fn complaints(&self) -> &dyn ComplaintRepository {
        self
    }

    fn notices(&self) -> &dyn NoticeRepository {
        self
    }
}

/// SeaORM implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    store: SeaStore<DatabaseConnection>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let store = SeaStore::new(db.clone());
        Self { db, store }
    }
}

impl Repositories for Persistence {
    fn users(&self) -> &dyn UserRepository {
        &self.store
    }

    fn properties(&self) -> &dyn PropertyRepository {
        &self.store
    }

    fn rooms(&self) -> &dyn RoomRepository {
        &self.store
    }

    fn tenants(&self) -> &dyn TenantRepository {
        &self.store
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.store
    }

    fn complaints(&self) -> &dyn ComplaintRepository {
        &self.store
    }

    fn notices(&self) -> &dyn NoticeRepository {
        &self.store
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // ReadCommitted plus the keyed locks held by callers is enough for
        // the counter recomputes done here.
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let outcome = {
            let store = SeaStore::new(&txn);
            f(TransactionContext::new(&store)).await
        };

        match outcome {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}
