//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - The in-memory backend
//! - Caching and rate limit counters (Redis)
//! - Keyed locks for occupancy recomputes
//! - Mail, file storage and realtime notification adapters
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod locks;
pub mod mailer;
pub mod memory;
pub mod notifier;
pub mod repositories;
pub mod storage;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, MigrationState, Migrator};
pub use locks::{KeyGuard, KeyedLocks};
pub use mailer::{Email, LogMailer, Mailer};
pub use memory::MemoryStore;
pub use notifier::{Audience, Event, LogNotifier, Notifications, Notifier};
pub use repositories::{
    ComplaintRepository, NoticeRepository, PaymentRepository, PropertyRepository, RoomRepository,
    TenantRepository, UserRepository,
};
pub use storage::{FileStorage, LocalStorage, StoredFile, Upload};
pub use unit_of_work::{Persistence, Repositories, TransactionContext, TxFuture, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
#[cfg(any(test, feature = "test-utils"))]
pub use notifier::MockNotifier;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockComplaintRepository, MockNoticeRepository, MockPaymentRepository, MockPropertyRepository,
    MockRoomRepository, MockTenantRepository, MockUserRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockFileStorage;
#[cfg(any(test, feature = "test-utils"))]
pub use testing::MockUnitOfWork;
