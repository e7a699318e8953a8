//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the hostel entities, their invariants, the ownership-based access decision
//! and the occupancy derivations.

#[macro_use]
mod macros;

pub mod access;
pub mod common;
pub mod complaint;
pub mod constants;
pub mod error;
pub mod notice;
pub mod occupancy;
pub mod password;
pub mod payment;
pub mod property;
pub mod room;
pub mod tenant;
pub mod user;

pub use access::{decide, Access, Denial, OwnershipChain, Requester, ResourceKind, ResourceRef};
pub use common::{Address, Image, Priority};
pub use complaint::{
    Complaint, ComplaintCategory, ComplaintChanges, ComplaintStatus, ComplaintView, NewComplaint,
    TimelineEntry,
};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use notice::{
    NewNotice, Notice, NoticeCategory, NoticeChanges, NoticeStatus, ReadReceipt, TargetAudience,
};
pub use occupancy::{ensure_vacancy, PropertyCounts, RoomOccupancy};
pub use password::Password;
pub use payment::{
    BillingMonth, NewPayment, Payment, PaymentChanges, PaymentMethod, PaymentStatus,
};
pub use property::{
    Contact, NewProperty, Property, PropertyAmenities, PropertyChanges, PropertyStatus,
    PropertyType, PropertyView,
};
pub use room::{Furnishing, NewRoom, Room, RoomAmenities, RoomChanges, RoomStatus, RoomType, RoomView};
pub use tenant::{
    Agreement, EmergencyContact, IdProof, IdProofKind, NewTenant, NoticePeriod, Occupation,
    OccupationKind, Tenant, TenantChanges, TenantStatus, TenantView,
};
pub use user::{User, UserResponse, UserRole};
