//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, take the authenticated `Requester` explicitly and
//! authorize through the `AccessResolver` before touching a record.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

pub mod access;
mod auth_service;
mod complaint_service;
pub mod container;
mod dashboard_service;
mod notice_service;
pub mod occupancy;
mod payment_service;
mod property_service;
mod room_service;
mod tenant_service;
mod user_service;

// Service Container
pub use container::{Collaborators, ServiceContainer, Services};

// Cross-cutting components
pub use access::AccessResolver;
pub use occupancy::{OccupancyEngine, ReconcileReport};

// Service traits and implementations
pub use auth_service::{
    AuthService, AuthSession, Authenticator, Claims, LoginRequest, RegisterRequest, TokenResponse,
};
pub use complaint_service::{ComplaintManager, ComplaintService};
pub use dashboard_service::{
    DashboardManager, DashboardService, DashboardStats, PaymentSummary, PortfolioStats,
    TenancyStats,
};
pub use notice_service::{NoticeManager, NoticeService};
pub use payment_service::{PaymentManager, PaymentService};
pub use property_service::{PropertyManager, PropertyService};
pub use room_service::{RoomManager, RoomService};
pub use tenant_service::{TenantManager, TenantService};
pub use user_service::{AdminSeed, UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use complaint_service::MockComplaintService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use dashboard_service::MockDashboardService;
#[cfg(any(test, feature = "test-utils"))]
pub use notice_service::MockNoticeService;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_service::MockPaymentService;
#[cfg(any(test, feature = "test-utils"))]
pub use property_service::MockPropertyService;
#[cfg(any(test, feature = "test-utils"))]
pub use room_service::MockRoomService;
#[cfg(any(test, feature = "test-utils"))]
pub use tenant_service::MockTenantService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
