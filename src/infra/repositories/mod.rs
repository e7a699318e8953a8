//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.
//! Every trait is implemented by the SeaORM store and the in-memory store.

mod complaint_repository;
pub(crate) mod entities;
mod notice_repository;
mod payment_repository;
mod property_repository;
mod room_repository;
mod sea_store;
mod tenant_repository;
mod user_repository;

pub use complaint_repository::ComplaintRepository;
pub use notice_repository::NoticeRepository;
pub use payment_repository::PaymentRepository;
pub(crate) use payment_repository::DUPLICATE_MONTH;
pub use property_repository::PropertyRepository;
pub use room_repository::RoomRepository;
pub use sea_store::{DbHandle, SeaStore};
pub use tenant_repository::TenantRepository;
pub use user_repository::UserRepository;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use complaint_repository::MockComplaintRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use notice_repository::MockNoticeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_repository::MockPaymentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use property_repository::MockPropertyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use room_repository::MockRoomRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use tenant_repository::MockTenantRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
